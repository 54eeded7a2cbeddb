//! Probabilistic primality: trial division by the primes below 1000,
//! then Miller–Rabin with random bases.

use rand_core::{CryptoRng, RngCore};

use crate::arithmetic::Montgomery;
use crate::digit::Digit;
use crate::{BigInteger, Result, ONE};

/// The 168 primes below 1000.
pub(crate) const LOW_PRIMES: [Digit; 168] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43,
    47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97, 101, 103, 107,
    109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181,
    191, 193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263,
    269, 271, 277, 281, 283, 293, 307, 311, 313, 317, 331, 337, 347, 349,
    353, 359, 367, 373, 379, 383, 389, 397, 401, 409, 419, 421, 431, 433,
    439, 443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503, 509, 521,
    523, 541, 547, 557, 563, 569, 571, 577, 587, 593, 599, 601, 607, 613,
    617, 619, 631, 641, 643, 647, 653, 659, 661, 673, 677, 683, 691, 701,
    709, 719, 727, 733, 739, 743, 751, 757, 761, 769, 773, 787, 797, 809,
    811, 821, 823, 827, 829, 839, 853, 857, 859, 863, 877, 881, 883, 887,
    907, 911, 919, 929, 937, 941, 947, 953, 967, 971, 977, 983, 991, 997,
];

const LARGEST_LOW_PRIME: Digit = LOW_PRIMES[LOW_PRIMES.len() - 1];

/// Whether some low prime divides `n`, for `n` beyond the low primes.
///
/// Consecutive primes are multiplied while their product fits a digit,
/// so that one multi-precision remainder serves the whole group.
fn has_low_factor(n: &BigInteger) -> bool {
    let mut i = 0;
    while i < LOW_PRIMES.len() {
        let start = i;
        let mut product = LOW_PRIMES[i];
        i += 1;
        while let Some(next) = LOW_PRIMES.get(i).and_then(|&p| product.checked_mul(p)) {
            product = next;
            i += 1;
        }

        let remainder = n.remainder_digit(product);
        if LOW_PRIMES[start..i].iter().any(|&p| remainder % p == 0) {
            return true;
        }
    }
    false
}

impl BigInteger {
    /// Whether `self` is probably prime.
    ///
    /// Zero, one and negative values are not. Values up to 997 are looked up,
    /// anything larger goes through trial division and then `rounds` rounds of
    /// Miller–Rabin with bases drawn uniformly from $[2, n - 2]$. Each round lets
    /// a composite through with probability at most $1/4$.
    ///
    /// Only failures of the random source are errors.
    pub fn is_probable_prime<R>(&self, rounds: usize, rng: &mut R) -> Result<bool>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        if self.signum() <= 0 {
            return Ok(false);
        }
        if let &[digit] = &self.magnitude[..] {
            if digit <= LARGEST_LOW_PRIME {
                return Ok(LOW_PRIMES.binary_search(&digit).is_ok());
            }
        }
        if self.is_even() || has_low_factor(self) {
            return Ok(false);
        }
        self.miller_rabin(rounds, rng)
    }

    /// `rounds` Miller–Rabin rounds for odd `self` > 3.
    fn miller_rabin<R>(&self, rounds: usize, rng: &mut R) -> Result<bool>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        // n - 1 = d * 2^s with d odd
        let n_minus_one = self.subtract(&ONE);
        let s = n_minus_one.trailing_zeros().unwrap_or(0);
        let d = n_minus_one.shift_right(s);

        // bases are 2 + [0, n - 3)
        let two = BigInteger::from(2u32);
        let base_range = self.subtract(&BigInteger::from(3u32));

        let ring = Montgomery::new(self);
        let one = ring.montgomery_one();
        let minus_one = ring.to_montgomery(&n_minus_one);

        'rounds: for _ in 0..rounds {
            let base = BigInteger::random_below(&base_range, rng)?.add(&two);
            let mut y = ring.pow(&ring.to_montgomery(&base), &d);
            if y == one || y == minus_one {
                continue;
            }
            for _ in 1..s {
                y = ring.mul(&y, &y);
                if y == minus_one {
                    continue 'rounds;
                }
                if y == one {
                    // a non-trivial square root of one
                    return Ok(false);
                }
            }
            return Ok(false);
        }
        Ok(true)
    }
}
