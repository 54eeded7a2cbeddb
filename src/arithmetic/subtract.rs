use super::add::signed_add;
use crate::digit::{Digit, SignedDoubleDigit, BITS};
use crate::BigInteger;

/// Subtract with borrow:
#[inline]
pub fn sbb(a: Digit, b: Digit, acc: &mut SignedDoubleDigit) -> Digit {
    *acc += a as SignedDoubleDigit;
    *acc -= b as SignedDoubleDigit;
    let lo = *acc as Digit;
    *acc >>= BITS;
    lo
}

// A non-zero borrow (if a.len() == b.len()) is -1, which as unsigned is
// the same as "all bits set", i.e., 0xFFFF_FFFF for Digit = u32
pub(crate) fn sub_assign_borrow(a: &mut [Digit], b: &[Digit]) -> Digit {
    debug_assert!(a.len() >= b.len());
    let mut borrow = 0;

    let (a_lo, a_hi) = a.split_at_mut(b.len());

    for (a, b) in a_lo.iter_mut().zip(b) {
        *a = sbb(*a, *b, &mut borrow);
    }

    if borrow != 0 {
        for a in a_hi {
            *a = sbb(*a, 0, &mut borrow);
            if borrow == 0 {
                break;
            }
        }
    }

    borrow as Digit
}

/// `a - b` for magnitudes with `a >= b`, untrimmed.
pub(crate) fn sub_magnitudes(a: &[Digit], b: &[Digit]) -> Vec<Digit> {
    let mut difference = a.to_vec();
    let borrow = sub_assign_borrow(&mut difference, b);
    debug_assert_eq!(borrow, 0);
    difference
}

impl BigInteger {
    pub fn subtract(&self, subtrahend: &Self) -> Self {
        signed_add(self.negative, &self.magnitude, !subtrahend.negative, &subtrahend.magnitude)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures::*;

    #[test]
    fn borrows_propagate() {
        let mut a = [0, 0, 1];
        assert_eq!(sub_assign_borrow(&mut a, &[1]), 0);
        assert_eq!(a, [Digit::MAX, Digit::MAX, 0]);

        let mut b = [0];
        assert_eq!(sub_assign_borrow(&mut b, &[1]), Digit::MAX);
    }

    #[test]
    fn signed_subtraction() {
        let cases = [
            ("12", "7", "5"),
            ("7", "12", "-5"),
            ("-7", "12", "-19"),
            ("-7", "-12", "5"),
            ("0", "3", "-3"),
            ("3", "3", "0"),
            ("18446744073709551616", "1", "18446744073709551615"),
        ];
        for (a, b, difference) in cases.iter() {
            let (a, b, difference) = (int(a), int(b), int(difference));
            crate::assert_op!(a - b == difference);
            assert_eq!(a.subtract(&b), difference);
        }
        // zero stays canonical
        assert!(!int("3").subtract(&int("3")).is_negative());
    }
}
