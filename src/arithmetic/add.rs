use core::cmp::Ordering;

use super::cmp_slice;
use super::subtract::sub_magnitudes;
use crate::digit::{Digit, DoubleDigit, BITS};
use crate::BigInteger;

//
// from num-bigint
//

// Add with carry:
#[inline]
pub fn adc(a: Digit, b: Digit, acc: &mut DoubleDigit) -> Digit {
    *acc += a as DoubleDigit;
    *acc += b as DoubleDigit;
    let lo = *acc as Digit;
    *acc >>= BITS;
    lo
}

#[inline]
/// Two argument addition of raw slices:
/// a += b
///
/// The caller _must_ ensure that a is big enough to store the result - typically this means
/// resizing a to max(a.len(), b.len()) + 1, to fit a possible carry.
pub(crate) fn add_assign_carry(a: &mut [Digit], b: &[Digit]) -> Digit {
    debug_assert!(a.len() >= b.len());

    let mut carry = 0;
    let (a_lo, a_hi) = a.split_at_mut(b.len());

    for (a, b) in a_lo.iter_mut().zip(b) {
        *a = adc(*a, *b, &mut carry);
    }

    if carry != 0 {
        for a in a_hi {
            *a = adc(*a, 0, &mut carry);
            if carry == 0 {
                break;
            }
        }
    }

    carry as Digit
}

/// Sum of two magnitudes, untrimmed.
pub(crate) fn add_magnitudes(a: &[Digit], b: &[Digit]) -> Vec<Digit> {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut sum = Vec::with_capacity(long.len() + 1);
    sum.extend_from_slice(long);
    let carry = add_assign_carry(&mut sum, short);
    if carry != 0 {
        sum.push(carry);
    }
    sum
}

/// Sum of `a` and `b` given as (sign, magnitude) pairs.
pub(super) fn signed_add(a_negative: bool, a: &[Digit], b_negative: bool, b: &[Digit]) -> BigInteger {
    if a_negative == b_negative {
        return BigInteger::from_parts(a_negative, add_magnitudes(a, b));
    }
    match cmp_slice(a, b) {
        Ordering::Equal => BigInteger::ZERO,
        Ordering::Greater => BigInteger::from_parts(a_negative, sub_magnitudes(a, b)),
        Ordering::Less => BigInteger::from_parts(b_negative, sub_magnitudes(b, a)),
    }
}

impl BigInteger {
    pub fn add(&self, summand: &Self) -> Self {
        signed_add(self.negative, &self.magnitude, summand.negative, &summand.magnitude)
    }

    /// Adds `delta` times $W^{\text{shift\_words}}$ to the magnitude, **in place**,
    /// where $W$ is the digit base.
    ///
    /// This is the prime search's way of stepping to the next candidate without
    /// allocating. Callers own the value being stepped; nothing else may hold on
    /// to it expecting it to stay put.
    pub(crate) fn d_add_offset(&mut self, delta: Digit, shift_words: usize) {
        if delta == 0 {
            return;
        }
        debug_assert!(!self.negative, "offsets are only added to candidates");
        if self.magnitude.len() <= shift_words {
            self.magnitude.resize(shift_words + 1, 0);
        }
        let carry = add_assign_carry(&mut self.magnitude[shift_words..], &[delta]);
        if carry != 0 {
            self.magnitude.push(carry);
        }
    }
}
