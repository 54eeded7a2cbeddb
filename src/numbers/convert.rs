//! Radix strings, big-endian bytes and narrowing conversions.

use crate::arithmetic::{div_rem_assign_digit, mul_digit_add_assign};
use crate::digit::{Digit, BITS};
use crate::{BigInteger, Error, Result};

const DIGIT_BYTES: usize = BITS / 8;

/// Largest power of `radix` fitting in a digit, and its exponent.
fn big_base(radix: u32) -> (Digit, usize) {
    let radix = radix as Digit;
    let mut base = radix;
    let mut power = 1;
    while let Some(next) = base.checked_mul(radix) {
        base = next;
        power += 1;
    }
    (base, power)
}

fn check_radix(radix: u32) -> Result<()> {
    if (2..=36).contains(&radix) {
        Ok(())
    } else {
        Err(Error::invalid(format!("unsupported radix {}", radix)))
    }
}

/// Flip all bits and add one, in place (two's complement negation).
fn negate_bytes(bytes: &mut [u8]) {
    let mut carry = true;
    for byte in bytes.iter_mut().rev() {
        let (sum, overflow) = (!*byte).overflowing_add(carry as u8);
        *byte = sum;
        carry = overflow;
    }
}

/// ## Strings
impl BigInteger {
    /// Parse an optional `-` followed by digits in `radix` (2 to 36, either case).
    pub fn from_str_radix(string: &str, radix: u32) -> Result<Self> {
        check_radix(radix)?;
        let (negative, digits) = match string.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, string),
        };
        if digits.is_empty() {
            return Err(Error::invalid(format!("no digits in {:?}", string)));
        }

        let (base, power) = big_base(radix);
        let mut magnitude = Vec::with_capacity(digits.len() / power + 1);
        let mut chunk: Digit = 0;
        let mut chunk_len = 0;

        for c in digits.chars() {
            let value = c.to_digit(radix).ok_or_else(|| {
                Error::invalid(format!("invalid digit {:?} for radix {}", c, radix))
            })?;
            chunk = chunk * radix as Digit + value as Digit;
            chunk_len += 1;
            if chunk_len == power {
                mul_digit_add_assign(&mut magnitude, base, chunk);
                chunk = 0;
                chunk_len = 0;
            }
        }
        if chunk_len > 0 {
            let multiplier = (radix as Digit).pow(chunk_len as u32);
            mul_digit_add_assign(&mut magnitude, multiplier, chunk);
        }

        Ok(Self::from_parts(negative, magnitude))
    }

    /// Render in `radix` (2 to 36), lowercase, `-` prefix for negative values.
    pub fn to_string_radix(&self, radix: u32) -> Result<String> {
        check_radix(radix)?;
        Ok(self.format_radix(radix))
    }

    pub(crate) fn format_radix(&self, radix: u32) -> String {
        if self.is_zero() {
            return "0".into();
        }

        let (base, power) = big_base(radix);
        let mut quotient = self.magnitude.clone();
        let mut chunks = Vec::new();
        while !quotient.is_empty() {
            chunks.push(div_rem_assign_digit(&mut quotient, base));
            crate::numbers::trim(&mut quotient);
        }

        let mut rendered = String::with_capacity(chunks.len() * power + 1);
        if self.negative {
            rendered.push('-');
        }
        let mut scratch = Vec::with_capacity(power);
        for (i, &chunk) in chunks.iter().rev().enumerate() {
            scratch.clear();
            let mut chunk = chunk;
            while chunk > 0 {
                let value = (chunk % radix as Digit) as u32;
                scratch.push(core::char::from_digit(value, radix).unwrap_or('?'));
                chunk /= radix as Digit;
            }
            // all chunks but the leading one are zero-padded
            if i > 0 {
                scratch.resize(power, '0');
            }
            rendered.extend(scratch.iter().rev());
        }
        rendered
    }
}

/// ## Bytes
impl BigInteger {
    /// Big-endian unsigned magnitude.
    pub fn from_unsigned_bytes_be(bytes: &[u8]) -> Self {
        let magnitude = bytes
            .rchunks(DIGIT_BYTES)
            .map(|chunk| chunk.iter().fold(0 as Digit, |acc, &b| (acc << 8) | b as Digit))
            .collect();
        Self::from_parts(false, magnitude)
    }

    /// Big-endian magnitude with an explicit sign, as stored in key fields.
    pub fn from_sign_magnitude_bytes_be(negative: bool, bytes: &[u8]) -> Self {
        let magnitude = Self::from_unsigned_bytes_be(bytes).magnitude;
        Self::from_parts(negative, magnitude)
    }

    /// Big-endian two's complement; the empty slice is zero.
    pub fn from_signed_bytes_be(bytes: &[u8]) -> Self {
        match bytes.first() {
            Some(&first) if first & 0x80 != 0 => {
                let mut magnitude = bytes.to_vec();
                negate_bytes(&mut magnitude);
                Self::from_sign_magnitude_bytes_be(true, &magnitude)
            }
            _ => Self::from_unsigned_bytes_be(bytes),
        }
    }

    /// Minimal big-endian magnitude, `[0]` for zero.
    pub fn to_unsigned_bytes_be(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self
            .magnitude
            .iter()
            .rev()
            .flat_map(|digit| digit.to_be_bytes())
            .skip_while(|&b| b == 0)
            .collect();
        if bytes.is_empty() {
            bytes.push(0);
        }
        bytes
    }

    /// Minimal big-endian two's complement.
    ///
    /// Non-negative values whose leading magnitude bit is set get a `0x00` pad,
    /// so that the encoding is not read back as negative.
    pub fn to_signed_bytes_be(&self) -> Vec<u8> {
        let len = self.bit_length() / 8 + 1;
        let magnitude = self.to_unsigned_bytes_be();
        let mut bytes = vec![0u8; len.saturating_sub(magnitude.len())];
        bytes.extend_from_slice(&magnitude);
        if self.negative {
            negate_bytes(&mut bytes);
        }
        bytes
    }
}

/// ## Narrowing
///
/// These reproduce two's complement truncation, e.g. 128 as a byte value is -128.
impl BigInteger {
    pub fn long_value(&self) -> i64 {
        let low = self
            .magnitude
            .iter()
            .take((64 + BITS - 1) / BITS)
            .enumerate()
            .fold(0u64, |acc, (i, &d)| acc | ((d as u64) << (i * BITS)));
        if self.negative {
            low.wrapping_neg() as i64
        } else {
            low as i64
        }
    }

    pub fn int_value(&self) -> i32 {
        self.long_value() as i32
    }

    pub fn short_value(&self) -> i16 {
        self.long_value() as i16
    }

    pub fn byte_value(&self) -> i8 {
        self.long_value() as i8
    }
}
