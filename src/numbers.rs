use std::borrow::Cow;
use std::sync::LazyLock;

use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::digit::{self, Digit, BITS};
use crate::Result;

mod convert;
mod trait_implementations;

/// Zero, the canonical non-negative empty magnitude.
pub static ZERO: BigInteger = BigInteger::ZERO;

/// One.
pub static ONE: LazyLock<BigInteger> = LazyLock::new(|| BigInteger::from(1u32));

/// Arbitrary-precision signed integer.
///
/// Internal representation is sign + magnitude, the magnitude being
/// little-endian [`Digit`]s.
///
/// Invariants, established by every constructor and operation:
/// - the most significant digit of the magnitude is non-zero,
/// - zero has an empty magnitude and is never negative.
///
/// Hence equality of representations coincides with equality of values.
///
/// Operations return new values. The one exception is the crate-internal
/// `d_add_offset`, which the prime search uses to step through candidates.
#[derive(Clone, Default, Hash, PartialEq, Eq, Zeroize)]
pub struct BigInteger {
    pub(crate) negative: bool,
    pub(crate) magnitude: Vec<Digit>,
}

/// Drop leading (most significant) zero digits.
pub(crate) fn trim(digits: &mut Vec<Digit>) {
    while let Some(&0) = digits.last() {
        digits.pop();
    }
}

// c'tors and such
impl BigInteger {
    pub const ZERO: Self = Self { negative: false, magnitude: Vec::new() };

    /// Assemble from sign and little-endian digits, restoring the invariants.
    pub(crate) fn from_parts(negative: bool, mut magnitude: Vec<Digit>) -> Self {
        trim(&mut magnitude);
        let negative = negative && !magnitude.is_empty();
        Self { negative, magnitude }
    }

    #[cfg(test)]
    pub(crate) fn from_digits(digits: &[Digit]) -> Self {
        Self::from_parts(false, digits.to_vec())
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn one() -> Self {
        ONE.clone()
    }

    /// Uniformly random in $[0, 2^{\text{bits}})$.
    ///
    /// Draws `ceil(bits / 8)` bytes from the RNG and masks the excess bits
    /// of the leading byte.
    pub fn random_bits<R>(bits: usize, rng: &mut R) -> Result<Self>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        if bits == 0 {
            return Ok(Self::ZERO);
        }
        let mut bytes = vec![0u8; (bits + 7) / 8];
        rng.try_fill_bytes(&mut bytes)?;
        let excess = bytes.len() * 8 - bits;
        bytes[0] &= 0xFF >> excess;
        let random = Self::from_unsigned_bytes_be(&bytes);
        bytes.zeroize();
        Ok(random)
    }

    /// Uniformly random in $[0, \text{bound})$, by rejection sampling.
    pub fn random_below<R>(bound: &Self, rng: &mut R) -> Result<Self>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        if bound.signum() <= 0 {
            return Err(crate::Error::invalid("random bound must be positive"));
        }
        let bits = bound.bit_length();
        loop {
            let candidate = Self::random_bits(bits, rng)?;
            if &candidate < bound {
                return Ok(candidate);
            }
        }
    }
}

impl BigInteger {
    /// The little-endian digits of the absolute value.
    pub fn magnitude(&self) -> &[Digit] {
        &self.magnitude
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.is_empty()
    }

    pub fn is_one(&self) -> bool {
        !self.negative && self.magnitude == [1]
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_odd(&self) -> bool {
        self.magnitude.first().map_or(false, |d| d & 1 == 1)
    }

    pub fn is_even(&self) -> bool {
        !self.is_odd()
    }

    /// -1, 0 or 1.
    pub fn signum(&self) -> i32 {
        match (self.negative, self.is_zero()) {
            (_, true) => 0,
            (true, false) => -1,
            (false, false) => 1,
        }
    }

    /// Absolute value; borrows `self` when it is already non-negative.
    pub fn abs(&self) -> Cow<'_, Self> {
        if self.negative {
            Cow::Owned(Self { negative: false, magnitude: self.magnitude.clone() })
        } else {
            Cow::Borrowed(self)
        }
    }

    pub fn negate(&self) -> Self {
        Self::from_parts(!self.negative, self.magnitude.clone())
    }

    /// Number of trailing zero bits of the magnitude, `None` for zero.
    pub(crate) fn trailing_zeros(&self) -> Option<usize> {
        let (index, digit) = self.magnitude.iter().enumerate().find(|(_, &d)| d != 0)?;
        Some(index * BITS + digit.trailing_zeros() as usize)
    }

    /// Remainder of the magnitude modulo a single digit.
    pub(crate) fn remainder_digit(&self, divisor: Digit) -> Digit {
        debug_assert_ne!(divisor, 0);
        let mut remainder = 0;
        for &d in self.magnitude.iter().rev() {
            remainder = crate::arithmetic::div_digits(remainder, d, divisor).1;
        }
        remainder
    }
}

impl From<u64> for BigInteger {
    fn from(value: u64) -> Self {
        Self { negative: false, magnitude: digit::digits_from_u64(value).collect() }
    }
}

impl From<i64> for BigInteger {
    fn from(value: i64) -> Self {
        Self { negative: value < 0, magnitude: digit::digits_from_u64(value.unsigned_abs()).collect() }
    }
}

impl From<u32> for BigInteger {
    fn from(value: u32) -> Self {
        Self::from(value as u64)
    }
}

impl From<i32> for BigInteger {
    fn from(value: i32) -> Self {
        Self::from(value as i64)
    }
}

impl From<usize> for BigInteger {
    fn from(value: usize) -> Self {
        Self::from(value as u64)
    }
}
