//! Bit operations with two's complement semantics for negative values,
//! as if every integer carried an infinite sign extension.

use super::add::add_assign_carry;
use super::subtract::sub_assign_borrow;
use crate::digit::{Digit, BITS};
use crate::BigInteger;

/// Number of significant bits of a trimmed magnitude.
pub(crate) fn magnitude_bits(magnitude: &[Digit]) -> usize {
    match magnitude.last() {
        None => 0,
        Some(top) => magnitude.len() * BITS - top.leading_zeros() as usize,
    }
}

/// Two's complement negation in place: flip everything, add one.
fn negate_assign(digits: &mut [Digit]) {
    for digit in digits.iter_mut() {
        *digit = !*digit;
    }
    add_assign_carry(digits, &[1]);
}

/// The low `len` digits of the two's complement of `x`.
///
/// `len` must exceed the magnitude's length, so the top digit holds the sign.
fn twos_complement(x: &BigInteger, len: usize) -> Vec<Digit> {
    debug_assert!(len > x.magnitude.len());
    let mut digits = x.magnitude.clone();
    digits.resize(len, 0);
    if x.negative {
        negate_assign(&mut digits);
    }
    digits
}

fn from_twos_complement(mut digits: Vec<Digit>) -> BigInteger {
    let negative = digits.last().map_or(false, |top| top >> (BITS - 1) == 1);
    if negative {
        negate_assign(&mut digits);
    }
    BigInteger::from_parts(negative, digits)
}

/// `|x| - 1` for non-zero `x`: the bits of a negative `x` are the
/// complement of this magnitude's bits.
fn magnitude_minus_one(x: &BigInteger) -> Vec<Digit> {
    debug_assert!(!x.is_zero());
    let mut digits = x.magnitude.clone();
    sub_assign_borrow(&mut digits, &[1]);
    crate::numbers::trim(&mut digits);
    digits
}

fn digitwise(a: &BigInteger, b: &BigInteger, op: impl Fn(Digit, Digit) -> Digit) -> BigInteger {
    let len = a.magnitude.len().max(b.magnitude.len()) + 1;
    let a = twos_complement(a, len);
    let b = twos_complement(b, len);
    from_twos_complement(a.iter().zip(b.iter()).map(|(&x, &y)| op(x, y)).collect())
}

impl BigInteger {
    pub fn and(&self, other: &Self) -> Self {
        digitwise(self, other, |x, y| x & y)
    }

    pub fn or(&self, other: &Self) -> Self {
        digitwise(self, other, |x, y| x | y)
    }

    pub fn xor(&self, other: &Self) -> Self {
        digitwise(self, other, |x, y| x ^ y)
    }

    /// `self & !other`
    pub fn and_not(&self, other: &Self) -> Self {
        digitwise(self, other, |x, y| x & !y)
    }

    /// Bitwise complement, which is `-(self + 1)`.
    pub fn not(&self) -> Self {
        self.negate().subtract(&crate::ONE)
    }

    pub fn test_bit(&self, n: usize) -> bool {
        if self.negative {
            !bit(&magnitude_minus_one(self), n)
        } else {
            bit(&self.magnitude, n)
        }
    }

    pub fn set_bit(&self, n: usize) -> Self {
        self.or(&single_bit(n))
    }

    pub fn clear_bit(&self, n: usize) -> Self {
        self.and_not(&single_bit(n))
    }

    pub fn flip_bit(&self, n: usize) -> Self {
        self.xor(&single_bit(n))
    }

    /// Index of the rightmost one bit, `None` for zero (which has none).
    pub fn lowest_set_bit(&self) -> Option<usize> {
        // negation preserves the trailing zeros in two's complement
        self.trailing_zeros()
    }

    /// Number of bits differing from the sign bit.
    pub fn bit_count(&self) -> usize {
        let count = |digits: &[Digit]| digits.iter().map(|d| d.count_ones() as usize).sum();
        if self.negative {
            count(&magnitude_minus_one(self))
        } else {
            count(&self.magnitude)
        }
    }

    /// Bits in the minimal two's complement representation, sign bit excluded.
    pub fn bit_length(&self) -> usize {
        if self.negative {
            magnitude_bits(&magnitude_minus_one(self))
        } else {
            magnitude_bits(&self.magnitude)
        }
    }
}

fn bit(digits: &[Digit], n: usize) -> bool {
    digits.get(n / BITS).map_or(false, |d| (d >> (n % BITS)) & 1 == 1)
}

fn single_bit(n: usize) -> BigInteger {
    crate::ONE.shift_left(n)
}

#[cfg(test)]
mod test {
    use crate::fixtures::*;

    #[test]
    fn queries() {
        let five = int("5");
        assert!(five.test_bit(0));
        assert!(!five.test_bit(1));
        assert!(five.test_bit(2));
        assert!(!five.test_bit(1000));
        assert_eq!(int("15").bit_count(), 4);
        assert_eq!(int("16").bit_length(), 5);
        assert_eq!(ZERO.bit_length(), 0);
        assert_eq!(ZERO.bit_count(), 0);
        assert_eq!(ZERO.lowest_set_bit(), None);
        assert_eq!(int("40").lowest_set_bit(), Some(3));
    }

    #[test]
    fn negative_queries() {
        // ...11111011
        let x = int("-5");
        assert!(x.test_bit(0));
        assert!(!x.test_bit(2));
        assert!(x.test_bit(3));
        assert!(x.test_bit(1000));
        assert_eq!(x.bit_count(), 1);
        assert_eq!(x.bit_length(), 3);
        assert_eq!(int("-1").bit_length(), 0);
        assert_eq!(int("-1").bit_count(), 0);
        assert_eq!(int("-128").bit_length(), 7);
        assert_eq!(int("-129").bit_length(), 8);
        assert_eq!(int("-40").lowest_set_bit(), Some(3));
    }

    #[test]
    fn logic() {
        let (a, b) = (int("12"), int("10"));
        assert_eq!(a.and(&b), int("8"));
        assert_eq!(a.or(&b), int("14"));
        assert_eq!(a.xor(&b), int("6"));
        assert_eq!(a.and_not(&b), int("4"));
        crate::assert_op!(a & b == int("8"));
        crate::assert_op!(a | b == int("14"));
        crate::assert_op!(a ^ b == int("6"));
    }

    #[test]
    fn negative_logic() {
        assert_eq!(int("-12").and(&int("10")), int("0"));
        assert_eq!(int("-12").or(&int("10")), int("-2"));
        assert_eq!(int("-12").xor(&int("10")), int("-2"));
        assert_eq!(int("-12").and(&int("-10")), int("-12"));
        assert_eq!(int("-1").and(&int("18446744073709551621")), int("18446744073709551621"));
        assert_eq!(int("5").and_not(&int("-1")), ZERO);
        assert_eq!(
            int("-18446744073709551616").or(&int("1")),
            int("-18446744073709551615")
        );
    }

    #[test]
    fn complement() {
        assert_eq!(int("5").not(), int("-6"));
        assert_eq!(int("-1").not(), ZERO);
        assert_eq!(!ZERO.clone(), int("-1"));
        assert_eq!(!&int("-6"), int("5"));
    }

    #[test]
    fn single_bits() {
        assert_eq!(ZERO.set_bit(100), int("1267650600228229401496703205376"));
        assert_eq!(int("7").clear_bit(1), int("5"));
        assert_eq!(int("7").flip_bit(3), int("15"));
        assert_eq!(int("-1").clear_bit(0), int("-2"));
        assert_eq!(int("-8").set_bit(0), int("-7"));
        assert_eq!(int("-8").flip_bit(70), int("-8").subtract(&(&*ONE << 70)));
    }
}
