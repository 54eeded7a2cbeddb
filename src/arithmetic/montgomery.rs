#[cfg(feature = "ct-maybe")]
use subtle::{Choice, ConditionallySelectable};

use super::cmp_slice;
use super::divide::div_rem_magnitudes;
use super::modular::{power, ModularRing};
use super::multiply::mac_with_carry;
use super::subtract::sub_assign_borrow;
use crate::digit::{Digit, DoubleDigit, BITS};
use crate::BigInteger;

/// Inverse of odd number modulo power of two: $e^{-1}\text{ mod }2^{|f|}$
///
/// This has $\mathcal{O}(\log n)$ loops in `Digit::BITS`: 5 iterations for u32,
/// 6 iterations for u64.
///
/// Source: Fig. 1 from
/// [GCD-Free Algorithms for Computing Modular Inverses (2003)][joy-paillier]
///
/// Note that this source is highly confusing! What they mean to say
/// is to iterate $y \leftarrow y(2 - ey)$ in $\mathbb{Z}/2^{|f|}$,
/// where the output is an inverse of $e$ modulo $2^{2i}$.
///
/// In other words, the $\text{mod }2^i$ is a typo, and should be $\text{mod }2^{|f|}$.
///
/// Cf. [Crypto StackExchange][cse].
///
/// [joy-paillier]: https://api.semanticscholar.org/CorpusID:17736455
/// [cse]: https://crypto.stackexchange.com/a/47496
fn e_inverse_digit_joye_paillier(e: Digit) -> Digit {
    debug_assert_ne!(e & 1, 0);

    // log_2(32) = 5, log_2(64) = 6.
    #[allow(non_snake_case)]
    let T = Digit::BITS.trailing_zeros();
    let mut y: Digit = 1;
    let two: Digit = 2;

    for _ in 1..=T {
        y = y.wrapping_mul(two.wrapping_sub(e.wrapping_mul(y)));
    }
    y
}

/// $Q_0 = -P_0^{-1}\text{(mod }2^{w}\text{)}$
fn digit_minus_inverse(p0: Digit) -> Digit {
    e_inverse_digit_joye_paillier(p0).wrapping_neg()
}

/// $W^{\text{exponent}} \text{ mod } n$, padded to the length of `n`.
fn power_of_base_mod(exponent_words: usize, n: &[Digit]) -> Vec<Digit> {
    let mut power = vec![0; exponent_words + 1];
    power[exponent_words] = 1;
    let (_, mut remainder) = div_rem_magnitudes(&power, n);
    remainder.resize(n.len(), 0);
    remainder
}

/// Montgomery context for an odd modulus $n$ of $k$ digits, with $R = W^k$.
///
/// Residues are kept as exactly $k$ digits, fully reduced, in
/// Montgomery representation $[x R]_n$.
///
/// The "trick" is that reduction of excess summands after multiplication can
/// be calculated by a simple right shift instead of an actual modular division.
///
/// The overhead of entering and leaving the representation is amortized by
/// the many multiplications of an exponentiation, which is why contexts are
/// computed once per modulus and reused.
#[derive(Clone, Debug)]
pub(crate) struct Montgomery {
    n: Vec<Digit>,
    /// $-n^{-1} \text{ mod } W$
    n_prime: Digit,
    /// $R^2 \text{ mod } n$
    r2: Vec<Digit>,
    /// $R \text{ mod } n$
    one: Vec<Digit>,
}

impl Montgomery {
    pub(crate) fn new(modulus: &BigInteger) -> Self {
        debug_assert!(modulus.signum() > 0 && modulus.is_odd());
        let n = modulus.magnitude.clone();
        let k = n.len();
        Self {
            n_prime: digit_minus_inverse(n[0]),
            r2: power_of_base_mod(2 * k, &n),
            one: power_of_base_mod(k, &n),
            n,
        }
    }

    /// Montgomery multiplication $a b R^{-1} \text{ mod } n$, coarsely
    /// integrated operand scanning (CIOS).
    pub(crate) fn mul(&self, a: &[Digit], b: &[Digit]) -> Vec<Digit> {
        let k = self.n.len();
        debug_assert!(a.len() == k && b.len() == k);
        let mut t = vec![0 as Digit; k + 2];

        for &bi in b {
            // t += a * b_i
            let mut carry: DoubleDigit = 0;
            for j in 0..k {
                t[j] = mac_with_carry(t[j], a[j], bi, &mut carry);
            }
            let sum = t[k] as DoubleDigit + carry;
            t[k] = sum as Digit;
            t[k + 1] = (sum >> BITS) as Digit;

            // t = (t + m * n) / W, where m is chosen to clear the lowest digit
            let m = t[0].wrapping_mul(self.n_prime);
            let mut carry: DoubleDigit = 0;
            mac_with_carry(t[0], m, self.n[0], &mut carry);
            for j in 1..k {
                t[j - 1] = mac_with_carry(t[j], m, self.n[j], &mut carry);
            }
            let sum = t[k] as DoubleDigit + carry;
            t[k - 1] = sum as Digit;
            t[k] = t[k + 1] + (sum >> BITS) as Digit;
            t[k + 1] = 0;
        }

        // t < 2n, one conditional subtraction completes the reduction
        t.truncate(k + 1);
        let must_reduce = t[k] != 0 || cmp_slice(&t[..k], &self.n).is_ge();

        #[cfg(not(feature = "ct-maybe"))]
        {
            if must_reduce {
                sub_assign_borrow(&mut t, &self.n);
            }
            t.truncate(k);
            t
        }

        #[cfg(feature = "ct-maybe")]
        {
            let mut reduced = t.clone();
            sub_assign_borrow(&mut reduced, &self.n);
            let choice = Choice::from(must_reduce as u8);
            for (digit, reduced) in t.iter_mut().zip(reduced.iter()) {
                digit.conditional_assign(reduced, choice);
            }
            t.truncate(k);
            t
        }
    }

    /// Residue `x` in $[0, n)$ to Montgomery representation.
    pub(crate) fn to_montgomery(&self, x: &BigInteger) -> Vec<Digit> {
        debug_assert!(!x.negative && cmp_slice(&x.magnitude, &self.n).is_lt());
        let mut x = x.magnitude.clone();
        x.resize(self.n.len(), 0);
        self.mul(&x, &self.r2)
    }

    pub(crate) fn to_normal(&self, y: &[Digit]) -> BigInteger {
        let mut unit = vec![0; self.n.len()];
        unit[0] = 1;
        BigInteger::from_parts(false, self.mul(y, &unit))
    }

    /// $R \text{ mod } n$, the Montgomery representation of one.
    pub(crate) fn montgomery_one(&self) -> &[Digit] {
        &self.one
    }

    /// `y^exponent`, both in and out of Montgomery representation.
    pub(crate) fn pow(&self, y: &[Digit], exponent: &BigInteger) -> Vec<Digit> {
        power(self, y, exponent)
    }
}

impl ModularRing for Montgomery {
    fn one(&self) -> Vec<Digit> {
        self.one.clone()
    }

    fn enter(&self, x: &BigInteger) -> Vec<Digit> {
        self.to_montgomery(x)
    }

    fn multiply(&self, a: &[Digit], b: &[Digit]) -> Vec<Digit> {
        self.mul(a, b)
    }

    fn leave(&self, y: &[Digit]) -> BigInteger {
        self.to_normal(y)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures::*;

    const F4: Digit = 65537;

    #[test]
    fn f4_inverse_digit() {
        let e = F4;

        let candidate = e_inverse_digit_joye_paillier(e);
        assert_eq!(candidate.wrapping_mul(e), 1);

        #[cfg(feature = "u32")]
        assert_eq!(candidate, 4294901761);
        #[cfg(feature = "u64")]
        assert_eq!(candidate, 18446462603027742721);

        for odd_number in (e..=(e + 1001)).step_by(2) {
            let candidate = e_inverse_digit_joye_paillier(odd_number);
            assert_eq!(candidate.wrapping_mul(odd_number), 1);
        }

        assert_eq!(digit_minus_inverse(e).wrapping_mul(e), Digit::MAX);
    }

    #[test]
    fn round_trip_and_multiply() {
        let p = int(P256_DEC);
        let ring = Montgomery::new(&p);
        let a = int("115792089210356248762697446949407573529996955224135760342422259061068512044369");
        let b = int("123456789012345678901234567890");
        let (ya, yb) = (ring.to_montgomery(&a), ring.to_montgomery(&b));
        assert_eq!(ring.to_normal(&ya), a);
        assert_eq!(ring.to_normal(ring.montgomery_one()), ONE.clone());

        let product = ring.to_normal(&ring.mul(&ya, &yb));
        assert_eq!(product, a.multiply(&b).modulo(&p).unwrap());
    }

    #[test]
    fn single_digit_modulus() {
        let n = int("497");
        let ring = Montgomery::new(&n);
        let y = ring.to_montgomery(&int("4"));
        assert_eq!(ring.to_normal(&ring.pow(&y, &int("13"))), int("445"));
    }
}
