use crate::digit::{Digit, DoubleDigit, BITS};
use crate::BigInteger;

/// Multiply-accumulate: returns the low digit of `a + b * c + acc`,
/// keeping the high digit in `acc`.
///
/// The sum cannot overflow: $(W - 1) + (W - 1)^2 + (W - 1) = W^2 - 1$.
#[inline]
pub(crate) fn mac_with_carry(a: Digit, b: Digit, c: Digit, acc: &mut DoubleDigit) -> Digit {
    *acc += a as DoubleDigit;
    *acc += (b as DoubleDigit) * (c as DoubleDigit);
    let lo = *acc as Digit;
    *acc >>= BITS;
    lo
}

/// Schoolbook (operand-scanning) product of two magnitudes, untrimmed.
///
/// Quadratic, which is fine for the sizes of cryptographic keys.
pub(crate) fn mul_magnitudes(a: &[Digit], b: &[Digit]) -> Vec<Digit> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut product = vec![0; a.len() + b.len()];
    for (i, &ai) in a.iter().enumerate() {
        if ai == 0 {
            continue;
        }
        let mut carry = 0;
        for (j, &bj) in b.iter().enumerate() {
            product[i + j] = mac_with_carry(product[i + j], ai, bj, &mut carry);
        }
        // nothing has been written this far up yet
        product[i + b.len()] = carry as Digit;
    }
    product
}

/// `digits = digits * multiplier + addend`, growing as needed.
pub(crate) fn mul_digit_add_assign(digits: &mut Vec<Digit>, multiplier: Digit, addend: Digit) {
    let mut carry = addend as DoubleDigit;
    for digit in digits.iter_mut() {
        *digit = mac_with_carry(0, *digit, multiplier, &mut carry);
    }
    if carry != 0 {
        digits.push(carry as Digit);
    }
}

impl BigInteger {
    pub fn multiply(&self, factor: &Self) -> Self {
        Self::from_parts(self.negative != factor.negative, mul_magnitudes(&self.magnitude, &factor.magnitude))
    }

    pub fn square(&self) -> Self {
        Self::from_parts(false, mul_magnitudes(&self.magnitude, &self.magnitude))
    }

    /// `self` to the power of `exponent`, by square-and-multiply.
    pub fn pow(&self, exponent: u32) -> Self {
        let mut result = Self::one();
        for i in (0..u32::BITS - exponent.leading_zeros()).rev() {
            result = result.square();
            if (exponent >> i) & 1 == 1 {
                result = result.multiply(self);
            }
        }
        result
    }
}
