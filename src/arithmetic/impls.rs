//! The `core::ops` operators, for all combinations of owned and borrowed operands.
//!
//! Division and remainder panic on a zero divisor, like the primitive integers;
//! use [`BigInteger::divide_and_remainder`] to handle that case.

use core::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Sub};
use core::ops::{AddAssign, MulAssign, SubAssign};

use crate::BigInteger;

macro_rules! forward_binop {
    (impl $trait:ident, $method:ident, |$a:ident, $b:ident| $body:expr) => {
        impl $trait<&BigInteger> for &BigInteger {
            type Output = BigInteger;

            #[inline]
            fn $method(self, other: &BigInteger) -> BigInteger {
                let ($a, $b) = (self, other);
                $body
            }
        }

        impl $trait<BigInteger> for &BigInteger {
            type Output = BigInteger;

            #[inline]
            fn $method(self, other: BigInteger) -> BigInteger {
                $trait::$method(self, &other)
            }
        }

        impl $trait<&BigInteger> for BigInteger {
            type Output = BigInteger;

            #[inline]
            fn $method(self, other: &BigInteger) -> BigInteger {
                $trait::$method(&self, other)
            }
        }

        impl $trait<BigInteger> for BigInteger {
            type Output = BigInteger;

            #[inline]
            fn $method(self, other: BigInteger) -> BigInteger {
                $trait::$method(&self, &other)
            }
        }
    };
}

forward_binop!(impl Add, add, |a, b| BigInteger::add(a, b));
forward_binop!(impl Sub, sub, |a, b| a.subtract(b));
forward_binop!(impl Mul, mul, |a, b| a.multiply(b));
forward_binop!(impl BitAnd, bitand, |a, b| a.and(b));
forward_binop!(impl BitOr, bitor, |a, b| a.or(b));
forward_binop!(impl BitXor, bitxor, |a, b| a.xor(b));

forward_binop!(impl Div, div, |a, b| a.divide(b).expect("attempt to divide by zero"));
forward_binop!(impl Rem, rem, |a, b| a
    .remainder(b)
    .expect("attempt to calculate the remainder with a divisor of zero"));

impl AddAssign<&BigInteger> for BigInteger {
    #[inline]
    fn add_assign(&mut self, other: &BigInteger) {
        *self = BigInteger::add(self, other);
    }
}

impl SubAssign<&BigInteger> for BigInteger {
    #[inline]
    fn sub_assign(&mut self, other: &BigInteger) {
        *self = self.subtract(other);
    }
}

impl MulAssign<&BigInteger> for BigInteger {
    #[inline]
    fn mul_assign(&mut self, other: &BigInteger) {
        *self = self.multiply(other);
    }
}

impl Neg for &BigInteger {
    type Output = BigInteger;

    fn neg(self) -> BigInteger {
        self.negate()
    }
}

impl Neg for BigInteger {
    type Output = BigInteger;

    fn neg(mut self) -> BigInteger {
        if !self.is_zero() {
            self.negative = !self.negative;
        }
        self
    }
}

impl Not for &BigInteger {
    type Output = BigInteger;

    fn not(self) -> BigInteger {
        BigInteger::not(self)
    }
}

impl Not for BigInteger {
    type Output = BigInteger;

    fn not(self) -> BigInteger {
        BigInteger::not(&self)
    }
}

#[cfg(test)]
mod test {
    use crate::fixtures::*;

    #[test]
    fn operators() {
        let (a, b) = (int("-1234567890123456789012345"), int("987654321"));
        crate::assert_op!(a + b == int("-1234567890123455801358024"));
        crate::assert_op!(a - b == int("-1234567890123457776666666"));
        crate::assert_op!(a * b == int("-1219326311248285321124827861592745"));
        crate::assert_op!(a / b == int("-1249999988734374"));
        crate::assert_op!(a % b == int("-986682291"));
    }

    #[test]
    fn assignments_and_unary() {
        let mut x = int("10");
        x += &int("5");
        x -= &int("3");
        x *= &int("-2");
        assert_eq!(x, int("-24"));
        assert_eq!(-x.clone(), int("24"));
        assert_eq!(-&x, int("24"));
        assert_eq!(-ZERO.clone(), ZERO);
        assert!(!(-ZERO.clone()).is_negative());
        assert_eq!(!x, int("23"));
    }

    #[test]
    #[should_panic(expected = "remainder with a divisor of zero")]
    fn remainder_operator_panics_on_zero() {
        let _ = &int("5") % &ZERO;
    }
}
