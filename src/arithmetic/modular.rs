#[cfg(feature = "ct-maybe")]
use subtle::{Choice, ConditionallySelectable};

use super::barrett::Barrett;
use super::montgomery::Montgomery;
use crate::digit::Digit;
use crate::{BigInteger, Error, Result, ZERO};

/// Residue class arithmetic modulo a fixed $n > 1$, on fixed-length digit
/// vectors in some internal representation.
pub(super) trait ModularRing {
    /// The representation of one.
    fn one(&self) -> Vec<Digit>;
    /// Residue in $[0, n)$ into the internal representation.
    fn enter(&self, x: &BigInteger) -> Vec<Digit>;
    fn multiply(&self, a: &[Digit], b: &[Digit]) -> Vec<Digit>;
    /// Back to the canonical residue.
    fn leave(&self, y: &[Digit]) -> BigInteger;
}

/// Left-to-right square-and-multiply of an entered `base` by a non-negative
/// exponent: one squaring and one multiplication per exponent bit.
///
/// With `ct-maybe`, the multiplication is always computed and selected
/// in constant time.
pub(super) fn power<R: ModularRing + ?Sized>(ring: &R, base: &[Digit], exponent: &BigInteger) -> Vec<Digit> {
    debug_assert!(!exponent.is_negative());
    let mut x = ring.one();

    for i in (0..exponent.bit_length()).rev() {
        x = ring.multiply(&x, &x);
        let bit = exponent.test_bit(i);

        #[cfg(not(feature = "ct-maybe"))]
        {
            if bit {
                x = ring.multiply(&x, base);
            }
        }

        #[cfg(feature = "ct-maybe")]
        {
            let product = ring.multiply(&x, base);
            let choice = Choice::from(bit as u8);
            for (digit, multiplied) in x.iter_mut().zip(product.iter()) {
                digit.conditional_assign(multiplied, choice);
            }
        }
    }
    x
}

/// ## Modular arithmetic
impl BigInteger {
    /// $\text{self}^{\text{exponent}} \text{ mod } m$, in $[0, m)$.
    ///
    /// A negative exponent inverts `self` first, which fails unless `self`
    /// and `m` are coprime. Fails for non-positive moduli.
    pub fn mod_pow(&self, exponent: &Self, modulus: &Self) -> Result<Self> {
        if modulus.signum() <= 0 {
            return Err(Error::Arithmetic("modulus not positive"));
        }
        if modulus.is_one() {
            return Ok(ZERO.clone());
        }

        let base = if exponent.is_negative() {
            self.mod_inverse(modulus)?
        } else {
            self.modulo(modulus)?
        };
        let exponent = exponent.abs();

        if modulus.is_odd() {
            let ring = Montgomery::new(modulus);
            Ok(ring.leave(&power(&ring, &ring.enter(&base), &exponent)))
        } else {
            let ring = Barrett::new(modulus);
            Ok(ring.leave(&power(&ring, &ring.enter(&base), &exponent)))
        }
    }

    /// $\text{self}^{-1} \text{ mod } m$, in $[0, m)$, by the extended Euclidean algorithm.
    pub fn mod_inverse(&self, modulus: &Self) -> Result<Self> {
        if modulus.signum() <= 0 {
            return Err(Error::Arithmetic("modulus not positive"));
        }

        // invariant: r_i = t_i * self (mod m)
        let (mut r0, mut r1) = (modulus.clone(), self.modulo(modulus)?);
        let (mut t0, mut t1) = (ZERO.clone(), Self::one());

        while !r1.is_zero() {
            let (q, r) = r0.divide_and_remainder(&r1)?;
            r0 = core::mem::replace(&mut r1, r);
            let t = t0.subtract(&q.multiply(&t1));
            t0 = core::mem::replace(&mut t1, t);
        }

        if !r0.is_one() {
            return Err(Error::Arithmetic("not invertible"));
        }
        t0.modulo(modulus)
    }

    /// Greatest common divisor of the absolute values, by binary GCD (Stein).
    ///
    /// `gcd(a, 0) == |a|`, in particular `gcd(0, 0) == 0`.
    pub fn gcd(&self, other: &Self) -> Self {
        let (za, zb) = match (self.trailing_zeros(), other.trailing_zeros()) {
            (None, _) => return other.abs().into_owned(),
            (_, None) => return self.abs().into_owned(),
            (Some(za), Some(zb)) => (za, zb),
        };
        let shift = za.min(zb);

        let mut a = self.abs().shift_right(za);
        let mut b = other.abs().shift_right(zb);

        // both odd from here on
        loop {
            if a > b {
                core::mem::swap(&mut a, &mut b);
            }
            b = b.subtract(&a);
            match b.trailing_zeros() {
                None => break,
                Some(zeros) => b = b.shift_right(zeros),
            }
        }

        a.shift_left(shift)
    }
}
