use std::time::{Duration, Instant};

use rand_core::{CryptoRng, RngCore};
use tracing::{debug, trace};

use super::PrimeOptions;
use crate::digit::Digit;
use crate::{BigInteger, Result};

/// Steps from one residue coprime to 30 to the next, starting at 1 mod 30:
/// 1, 7, 11, 13, 17, 19, 23, 29, 31.
pub(crate) const GCD_30_DELTAS: [Digit; 8] = [6, 4, 2, 4, 2, 4, 6, 2];

/// Random `bits`-bit value with the top bit set, advanced to the next value
/// congruent to 1 mod 30.
///
/// The result may exceed `bits` bits; callers check.
pub(crate) fn random_candidate<R>(bits: usize, rng: &mut R) -> Result<BigInteger>
where
    R: CryptoRng + RngCore + ?Sized,
{
    let mut candidate = BigInteger::random_bits(bits, rng)?.set_bit(bits - 1);
    let residue = candidate.remainder_digit(30);
    candidate.d_add_offset((31 - residue) % 30, 0);
    Ok(candidate)
}

/// Step-wise single-threaded prime search, for hosts that schedule the work
/// themselves.
///
/// Each call to [`run_slice`](Self::run_slice) tests candidates until a prime
/// turns up or the slice's time runs out; the position in the search is kept
/// across calls.
#[derive(Clone, Debug)]
pub struct PrimeSearch {
    bits: usize,
    rounds: usize,
    candidate: BigInteger,
    delta_index: usize,
    tested: usize,
}

impl PrimeSearch {
    /// Draws the first candidate.
    pub fn new<R>(bits: usize, options: &PrimeOptions, rng: &mut R) -> Result<Self>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        options.validate(bits)?;
        Ok(Self {
            bits,
            rounds: options.rounds_for(bits),
            candidate: random_candidate(bits, rng)?,
            delta_index: 0,
            tested: 0,
        })
    }

    /// The next value to be tested.
    pub fn candidate(&self) -> &BigInteger {
        &self.candidate
    }

    /// How many candidates were tested so far.
    pub fn tested(&self) -> usize {
        self.tested
    }

    /// Search for at most `max_block_time` (at least one candidate is tested),
    /// or until a prime is found if `None`.
    ///
    /// Returns `Ok(None)` when the time ran out.
    pub fn run_slice<R>(&mut self, max_block_time: Option<Duration>, rng: &mut R) -> Result<Option<BigInteger>>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        let start = Instant::now();
        loop {
            if self.candidate.bit_length() > self.bits {
                trace!(bits = self.bits, "candidate overflowed, drawing a new one");
                self.candidate = random_candidate(self.bits, rng)?;
                self.delta_index = 0;
            }

            self.tested += 1;
            if self.candidate.is_probable_prime(self.rounds, rng)? {
                debug!(bits = self.bits, tested = self.tested, "found probable prime");
                return Ok(Some(self.candidate.clone()));
            }
            self.step();

            if let Some(limit) = max_block_time {
                if start.elapsed() >= limit {
                    return Ok(None);
                }
            }
        }
    }

    fn step(&mut self) {
        self.candidate.d_add_offset(GCD_30_DELTAS[self.delta_index], 0);
        self.delta_index = (self.delta_index + 1) % GCD_30_DELTAS.len();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures::*;

    const COPRIME_TO_30: [Digit; 8] = [1, 7, 11, 13, 17, 19, 23, 29];

    #[test]
    fn deltas_walk_the_coprime_residues() {
        let mut residue = 1;
        for (delta, expected) in GCD_30_DELTAS.iter().zip(COPRIME_TO_30.iter().cycle().skip(1)) {
            residue = (residue + delta) % 30;
            assert_eq!(residue, *expected);
        }
        assert_eq!(GCD_30_DELTAS.iter().sum::<Digit>(), 30);
    }

    #[test]
    fn candidates_are_aligned() {
        let mut rng = seeded(59);
        for bits in [5, 6, 16, 64, 100, 512] {
            let candidate = random_candidate(bits, &mut rng).unwrap();
            assert_eq!(candidate.remainder_digit(30), 1);
            assert!(candidate.test_bit(bits - 1) || candidate.bit_length() > bits);
        }
    }

    #[test]
    fn every_candidate_is_coprime_to_30() {
        let mut rng = seeded(61);
        let options = PrimeOptions::default();
        let mut search = PrimeSearch::new(256, &options, &mut rng).unwrap();
        for _ in 0..40 {
            let residue = search.candidate().remainder_digit(30);
            assert!(COPRIME_TO_30.contains(&residue));
            search.step();
        }
    }

    #[test]
    fn slices_resume() {
        let options = PrimeOptions::default();
        let mut rng = seeded(67);
        let mut search = PrimeSearch::new(200, &options, &mut rng).unwrap();
        let mut slices = 0;
        let prime = loop {
            slices += 1;
            if let Some(prime) = search.run_slice(Some(Duration::ZERO), &mut rng).unwrap() {
                break prime;
            }
            // one candidate per empty slice
            assert_eq!(search.tested(), slices);
        };
        assert_eq!(prime.bit_length(), 200);
        assert!(COPRIME_TO_30.contains(&prime.remainder_digit(30)));

        // the same seed finds the same prime in one go
        let mut rng = seeded(67);
        let mut search = PrimeSearch::new(200, &options, &mut rng).unwrap();
        assert_eq!(search.run_slice(None, &mut rng).unwrap(), Some(prime));
        assert_eq!(search.tested(), slices);
    }

    #[test]
    fn regenerates_past_the_bit_length() {
        // 31 is the only aligned 5-bit value; the search must not wander off
        let mut rng = seeded(71);
        let options = PrimeOptions::default();
        for _ in 0..10 {
            let mut search = PrimeSearch::new(5, &options, &mut rng).unwrap();
            let prime = search.run_slice(None, &mut rng).unwrap().unwrap();
            assert_eq!(prime.bit_length(), 5);
        }
    }
}
