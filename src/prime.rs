//! Probable-prime generation.
//!
//! Candidates are random values of the requested size, aligned to the residue
//! class 1 mod 30 and then stepped through the residues coprime to 30, each
//! tested with [`BigInteger::is_probable_prime`]. The search either runs on the
//! calling thread, in slices of bounded duration, or is fanned out over worker
//! threads, in which case the first prime found wins.
//!
//! ```
//! use forge_bigint::prime::{generate_probable_prime, PrimeOptions};
//!
//! let mut rng = rand::thread_rng();
//! let options = PrimeOptions::default().with_miller_rabin_rounds(10);
//! let prime = generate_probable_prime(64, &options, &mut rng).unwrap();
//! assert_eq!(prime.bit_length(), 64);
//! ```

use core::{fmt, str::FromStr, time::Duration};

use rand_core::{CryptoRng, RngCore};
use tracing::{debug, warn};

use crate::{BigInteger, Error, Result};

mod primeinc;
mod workers;

pub use primeinc::PrimeSearch;

/// Smallest bit length the generator accepts.
pub const MIN_BITS: usize = 5;

/// Candidates per worker assignment, unless configured otherwise.
pub const DEFAULT_WORK_LOAD: usize = 100;

/// Prime search algorithms. There is just the one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Step through the residues coprime to 30, starting from a random value.
    #[default]
    PrimeInc,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::PrimeInc => "PRIMEINC",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "PRIMEINC" => Ok(Algorithm::PrimeInc),
            _ => Err(Error::invalid(format!("unknown prime generation algorithm {:?}", name))),
        }
    }
}

/// How many worker threads search in parallel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Workers {
    /// Search on the calling thread.
    #[default]
    Single,
    /// This many worker threads, the calling thread coordinates.
    Count(usize),
    /// One worker per available core, except one for the calling thread.
    Auto,
}

impl From<usize> for Workers {
    fn from(count: usize) -> Self {
        match count {
            0 => Workers::Single,
            count => Workers::Count(count),
        }
    }
}

impl Workers {
    /// The number of threads to spawn, zero meaning none.
    fn resolve(self) -> Result<usize> {
        match self {
            Workers::Single => Ok(0),
            Workers::Count(count) => Ok(count),
            Workers::Auto => std::thread::available_parallelism()
                .map(|cores| cores.get() - 1)
                .map_err(|e| Error::ResourceUnavailable(format!("cannot count cores: {}", e))),
        }
    }
}

/// Miller–Rabin rounds for a false positive rate below $2^{-80}$ on random
/// candidates of the given size.
pub fn miller_rabin_rounds(bits: usize) -> usize {
    match bits {
        0..=100 => 27,
        101..=150 => 18,
        151..=200 => 15,
        201..=250 => 12,
        251..=300 => 9,
        301..=350 => 8,
        351..=400 => 7,
        401..=500 => 6,
        501..=600 => 5,
        601..=800 => 4,
        801..=1250 => 3,
        _ => 2,
    }
}

/// Knobs of [`generate_probable_prime`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimeOptions {
    pub algorithm: Algorithm,
    /// Overrides [`miller_rabin_rounds`].
    pub miller_rabin_rounds: Option<usize>,
    /// Length of a search slice on the calling thread, `None` for a single
    /// slice that runs until a prime is found.
    pub max_block_time: Option<Duration>,
    pub workers: Workers,
    /// Candidates per worker assignment.
    pub work_load: usize,
}

impl Default for PrimeOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            miller_rabin_rounds: None,
            max_block_time: None,
            workers: Workers::default(),
            work_load: DEFAULT_WORK_LOAD,
        }
    }
}

impl PrimeOptions {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Select the algorithm by name, failing for unknown names.
    pub fn with_algorithm_name(self, name: &str) -> Result<Self> {
        Ok(self.with_algorithm(name.parse()?))
    }

    pub fn with_miller_rabin_rounds(mut self, rounds: usize) -> Self {
        self.miller_rabin_rounds = Some(rounds);
        self
    }

    pub fn with_max_block_time(mut self, max_block_time: Duration) -> Self {
        self.max_block_time = Some(max_block_time);
        self
    }

    /// Slice length in milliseconds; negative values disable slicing.
    pub fn with_max_block_time_ms(mut self, millis: i64) -> Self {
        self.max_block_time = u64::try_from(millis).ok().map(Duration::from_millis);
        self
    }

    pub fn with_workers(mut self, workers: impl Into<Workers>) -> Self {
        self.workers = workers.into();
        self
    }

    pub fn with_work_load(mut self, work_load: usize) -> Self {
        self.work_load = work_load;
        self
    }

    /// Rounds for candidates of `bits` bits.
    pub fn rounds_for(&self, bits: usize) -> usize {
        self.miller_rabin_rounds.unwrap_or_else(|| miller_rabin_rounds(bits))
    }

    pub(crate) fn validate(&self, bits: usize) -> Result<()> {
        if bits < MIN_BITS {
            return Err(Error::invalid(format!("cannot generate {}-bit primes, minimum is {}", bits, MIN_BITS)));
        }
        if self.work_load == 0 {
            return Err(Error::invalid("work load must be positive"));
        }
        Ok(())
    }
}

/// A random probable prime of exactly `bits` bits.
///
/// With workers, the result is whichever prime some worker finds first, and
/// is therefore not reproducible from the state of `rng`. Without, it is.
///
/// If the workers cannot be started, the search quietly continues on the
/// calling thread.
pub fn generate_probable_prime<R>(bits: usize, options: &PrimeOptions, rng: &mut R) -> Result<BigInteger>
where
    R: CryptoRng + RngCore + ?Sized,
{
    options.validate(bits)?;
    let rounds = options.rounds_for(bits);
    debug!(bits, rounds, algorithm = %options.algorithm, workers = ?options.workers, "generating probable prime");

    match options.workers.resolve() {
        Ok(0) => {}
        Ok(count) => match workers::search(bits, rounds, options.work_load, count, rng) {
            Err(Error::ResourceUnavailable(reason)) => {
                warn!(%reason, "prime search workers unavailable, searching on the calling thread");
            }
            result => return result,
        },
        Err(error) => {
            warn!(%error, "prime search workers unavailable, searching on the calling thread");
        }
    }

    let mut search = PrimeSearch::new(bits, options, rng)?;
    loop {
        if let Some(prime) = search.run_slice(options.max_block_time, rng)? {
            return Ok(prime);
        }
        std::thread::yield_now();
    }
}
