use super::cmp_slice;
use super::divide::div_rem_magnitudes;
use super::modular::ModularRing;
use super::multiply::mul_magnitudes;
use super::subtract::sub_assign_borrow;
use crate::digit::Digit;
use crate::BigInteger;

/// Barrett reduction modulo $n$ of $k$ digits, for the moduli Montgomery
/// cannot handle (the even ones).
///
/// With $\mu = \lfloor W^{2k} / n \rfloor$ precomputed, a product $x < n^2$
/// is reduced by two multiplications and at most two subtractions.
///
/// Residues are kept as exactly $k$ digits.
#[derive(Clone, Debug)]
pub(crate) struct Barrett {
    /// the modulus, padded to $k + 1$ digits for comparisons
    n: Vec<Digit>,
    mu: Vec<Digit>,
    k: usize,
}

impl Barrett {
    pub(crate) fn new(modulus: &BigInteger) -> Self {
        debug_assert!(modulus.signum() > 0);
        let k = modulus.magnitude.len();
        let mut power = vec![0; 2 * k + 1];
        power[2 * k] = 1;
        let (mut mu, _) = div_rem_magnitudes(&power, &modulus.magnitude);
        crate::numbers::trim(&mut mu);

        let mut n = modulus.magnitude.clone();
        n.push(0);
        Self { n, mu, k }
    }

    /// $x \text{ mod } n$ for $x < W^{2k}$, given as $2k$ digits.
    fn reduce(&self, x: &[Digit]) -> Vec<Digit> {
        let k = self.k;
        debug_assert_eq!(x.len(), 2 * k);

        // q = floor(floor(x / W^(k-1)) * mu / W^(k+1)) underestimates x / n by at most 2
        let q2 = mul_magnitudes(&x[k - 1..], &self.mu);
        let q3 = q2.get(k + 1..).unwrap_or(&[]);

        // r = (x - q * n) mod W^(k+1), which is exact since the true value is below 3n
        let mut r = x[..=k].to_vec();
        let mut qn = mul_magnitudes(q3, &self.n[..k]);
        qn.resize(qn.len().max(k + 1), 0);
        sub_assign_borrow(&mut r, &qn[..=k]);

        while cmp_slice(&r, &self.n).is_ge() {
            sub_assign_borrow(&mut r, &self.n);
        }
        r.truncate(k);
        r
    }
}

impl ModularRing for Barrett {
    fn one(&self) -> Vec<Digit> {
        // n > 1 here, so one is already reduced
        let mut one = vec![0; self.k];
        one[0] = 1;
        one
    }

    fn enter(&self, x: &BigInteger) -> Vec<Digit> {
        let mut digits = x.magnitude.clone();
        digits.resize(self.k, 0);
        digits
    }

    fn multiply(&self, a: &[Digit], b: &[Digit]) -> Vec<Digit> {
        self.reduce(&mul_magnitudes(a, b))
    }

    fn leave(&self, y: &[Digit]) -> BigInteger {
        BigInteger::from_parts(false, y.to_vec())
    }
}
