use core::ops::{Shl, ShlAssign, Shr, ShrAssign};

use crate::digit::{Digit, BITS};
use crate::BigInteger;

/// `a << bits` on a magnitude, growing by the spilled digits.
///
/// Note that "left" means "higher number".
pub(crate) fn shl_magnitude(a: &[Digit], bits: usize) -> Vec<Digit> {
    if a.is_empty() {
        return Vec::new();
    }
    let n_digits = bits / BITS;
    let n_bits = bits % BITS;

    let mut data = Vec::with_capacity(a.len() + n_digits + 1);
    data.resize(n_digits, 0);

    if n_bits == 0 {
        data.extend_from_slice(a);
    } else {
        let mut carry = 0;
        for &elem in a {
            data.push((elem << n_bits) | carry);
            carry = elem >> (BITS - n_bits);
        }
        if carry != 0 {
            data.push(carry);
        }
    }
    data
}

/// `a >> bits` on a magnitude, dropping the shifted out bits. Untrimmed.
///
/// Note that "right" means "lower number".
pub(crate) fn shr_magnitude(a: &[Digit], bits: usize) -> Vec<Digit> {
    let n_digits = bits / BITS;
    if n_digits >= a.len() {
        return Vec::new();
    }
    let n_bits = bits % BITS;
    let mut data = a[n_digits..].to_vec();

    if n_bits > 0 {
        let mut borrow = 0;
        for elem in data.iter_mut().rev() {
            let new_borrow = *elem << (BITS - n_bits);
            *elem = (*elem >> n_bits) | borrow;
            borrow = new_borrow;
        }
    }
    data
}

impl BigInteger {
    /// `self * 2^bits`.
    pub fn shift_left(&self, bits: usize) -> Self {
        Self::from_parts(self.negative, shl_magnitude(&self.magnitude, bits))
    }

    /// `floor(self / 2^bits)`, i.e. an arithmetic shift: negative values
    /// round towards negative infinity and end at -1, never at zero.
    pub fn shift_right(&self, bits: usize) -> Self {
        let shifted = shr_magnitude(&self.magnitude, bits);
        if !self.negative {
            return Self::from_parts(false, shifted);
        }
        // some one bit got shifted out: the magnitude rounds up
        let inexact = self.trailing_zeros().map_or(false, |zeros| zeros < bits);
        let shifted = Self::from_parts(true, shifted);
        if inexact {
            shifted.subtract(&crate::ONE)
        } else {
            shifted
        }
    }
}

impl ShlAssign<usize> for BigInteger {
    #[inline]
    fn shl_assign(&mut self, bits: usize) {
        *self = self.shift_left(bits);
    }
}

impl ShrAssign<usize> for BigInteger {
    #[inline]
    fn shr_assign(&mut self, bits: usize) {
        *self = self.shift_right(bits);
    }
}

impl Shl<usize> for &BigInteger {
    type Output = BigInteger;

    #[inline]
    fn shl(self, bits: usize) -> Self::Output {
        self.shift_left(bits)
    }
}

impl Shl<usize> for BigInteger {
    type Output = BigInteger;

    #[inline]
    fn shl(self, bits: usize) -> Self::Output {
        self.shift_left(bits)
    }
}

impl Shr<usize> for &BigInteger {
    type Output = BigInteger;

    #[inline]
    fn shr(self, bits: usize) -> Self::Output {
        self.shift_right(bits)
    }
}

impl Shr<usize> for BigInteger {
    type Output = BigInteger;

    #[inline]
    fn shr(self, bits: usize) -> Self::Output {
        self.shift_right(bits)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures::*;

    #[test]
    fn magnitudes() {
        let max = Digit::MAX;
        assert_eq!(shl_magnitude(&[1], BITS), [0, 1]);
        assert_eq!(shl_magnitude(&[max], 1), [max - 1, 1]);
        assert_eq!(shl_magnitude(&[], 100), [] as [Digit; 0]);
        assert_eq!(shr_magnitude(&[0, 1], BITS), [1]);
        assert_eq!(shr_magnitude(&[max - 1, 1], 1), [max, 0]);
        assert_eq!(shr_magnitude(&[1, 2, 3], 3 * BITS), [] as [Digit; 0]);
    }

    #[test]
    fn left() {
        assert_eq!(int("1") << 100, int("1267650600228229401496703205376"));
        assert_eq!(int("-3") << 2, int("-12"));
        assert_eq!(ZERO.shift_left(77), ZERO);
        let mut x = int("5");
        x <<= 0;
        assert_eq!(x, int("5"));
    }

    #[test]
    fn right_is_floor_division() {
        assert_eq!(int("1267650600228229401496703205376") >> 100, int("1"));
        assert_eq!(int("7") >> 1, int("3"));
        assert_eq!(int("-7") >> 1, int("-4"));
        assert_eq!(int("-8") >> 1, int("-4"));
        assert_eq!(int("-1") >> 10, int("-1"));
        assert_eq!(int("-1267650600228229401496703205376") >> 100, int("-1"));
        assert_eq!(int("-1267650600228229401496703205377") >> 100, int("-2"));
        assert_eq!(int("5") >> 1000, ZERO);
        assert_eq!(int("-5") >> 1000, int("-1"));
    }

    #[test]
    fn shifts_agree_with_pow() {
        let mut rng = seeded(3);
        let x = BigInteger::random_bits(333, &mut rng).unwrap();
        for bits in [0, 1, 31, 32, 63, 64, 65, 129] {
            let power = int("2").pow(bits as u32);
            assert_eq!(&x << bits, &x * &power);
            assert_eq!(&x >> bits, (&x / &power));
        }
    }
}
