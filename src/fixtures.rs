//! Shared test helpers.

use hex_literal::hex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_core::{impls, CryptoRng, RngCore};

pub use crate::{BigInteger, Error, ONE, ZERO};

/// The P-256 field prime $2^{256} - 2^{224} + 2^{192} + 2^{96} - 1$.
pub const P256_DEC: &str = "115792089210356248762697446949407573530086143415290314195533631308867097853951";
pub const P256_BYTES: [u8; 32] = hex!("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff");

pub fn int(decimal: &str) -> BigInteger {
    decimal.parse().unwrap()
}

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Hands out 0, 1, 2, ... as bytes; `.0` counts the bytes drawn.
pub struct CountingRng(pub u64);

impl CryptoRng for CountingRng {}

impl RngCore for CountingRng {
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest {
            *byte = self.0 as u8;
            self.0 += 1;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// A random source that is always broken.
pub struct FailingRng;

impl CryptoRng for FailingRng {}

impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        panic!("entropy source unavailable")
    }

    fn next_u64(&mut self) -> u64 {
        panic!("entropy source unavailable")
    }

    fn fill_bytes(&mut self, _: &mut [u8]) {
        panic!("entropy source unavailable")
    }

    fn try_fill_bytes(&mut self, _: &mut [u8]) -> Result<(), rand_core::Error> {
        Err(rand_core::Error::new("entropy source unavailable"))
    }
}
