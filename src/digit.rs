/// A word on the machine, one limb of a [`BigInteger`](crate::BigInteger) magnitude.
///
/// Feature `u32` forces the digit to be 32-bit even on 64-bit architectures,
/// feature `u64` forces the digit to be 64-bit even on 32-bit architectures.
///
/// This is done only for easier testing, both widths must give identical results.
pub type Digit = digit::Digit;

/// Unsigned type with twice as many bits as [`Digit`].
pub(crate) type DoubleDigit = digit::DoubleDigit;
/// Signed type with twice as many bits as [`Digit`].
pub(crate) type SignedDoubleDigit = digit::SignedDoubleDigit;

/// Number of bits in a [`Digit`].
pub(crate) const BITS: usize = Digit::BITS as usize;

#[cfg(not(any(feature = "u32", feature = "u64")))]
compile_error!("Either feature u32 or feature u64!");

#[cfg(all(feature = "u32", feature = "u64"))]
compile_error!("Either feature u32 or feature u64, not both!");

#[cfg(feature = "u32")]
mod digit {
    pub type Digit = u32;
    pub type DoubleDigit = u64;
    pub type SignedDoubleDigit = i64;
}

#[cfg(feature = "u64")]
mod digit {
    pub type Digit = u64;
    pub type DoubleDigit = u128;
    pub type SignedDoubleDigit = i128;
}

/// Split a `u64` into little-endian digits.
pub(crate) fn digits_from_u64(value: u64) -> impl Iterator<Item = Digit> {
    let mut value = value;
    core::iter::from_fn(move || {
        if value == 0 {
            return None;
        }
        let digit = value as Digit;
        value = value.checked_shr(BITS as u32).unwrap_or(0);
        Some(digit)
    })
}
