//! Arbitrary-precision signed integers, probable-prime generation and the
//! RSA primitives built on them.
//!
//! [`BigInteger`] has value semantics with two's-complement bitwise behaviour,
//! like the integers of most big-number libraries. Modular exponentiation goes
//! through Montgomery multiplication for odd moduli and Barrett reduction for
//! even ones.
//!
//! Primes come from [`generate_probable_prime`], which searches on the calling
//! thread or on a pool of worker threads:
//!
//! ```
//! use forge_bigint::{generate_probable_prime, PrimeOptions, Workers};
//!
//! let options = PrimeOptions::default().with_workers(Workers::Count(2));
//! let p = generate_probable_prime(128, &options, &mut rand::thread_rng()).unwrap();
//! assert_eq!(p.bit_length(), 128);
//! ```
//!
//! Digits are as wide as the target's pointers unless feature `u32` or `u64`
//! says otherwise. Feature `ct-maybe` makes Montgomery multiplication and exponentiation
//! branch-free with respect to their operands.

mod arithmetic;
mod digit;
pub use digit::Digit;
mod error;
pub use error::{Error, Result};
mod numbers;
pub use numbers::{BigInteger, ONE, ZERO};
mod primality;
pub mod prime;
pub use prime::{generate_probable_prime, Algorithm, PrimeOptions, PrimeSearch, Workers};
pub mod rsa;

#[cfg(test)]
mod fixtures;
