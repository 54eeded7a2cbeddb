//! RSA key components and the raw primitives.
//!
//! Keys are generated from two probable primes `p > q` of half the modulus
//! size each, with `gcd(e, p - 1) = gcd(e, q - 1) = 1`, and a modulus `n = pq`
//! of exactly the requested size. Private keys carry the CRT components
//! `dP = d mod (p - 1)`, `dQ = d mod (q - 1)` and `qInv = q^{-1} mod p`.
//!
//! Padding schemes and key serialization live elsewhere; this module works on
//! message representatives, i.e. integers in $[0, n)$.

use rand_core::{CryptoRng, RngCore};
use tracing::{debug, trace};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::prime::{generate_probable_prime, PrimeOptions, MIN_BITS};
use crate::{BigInteger, Error, Result, ONE};

/// The usual public exponent, F4 (aka the fourth Fermat prime).
pub const DEFAULT_EXPONENT: u32 = 0x10001;

/// RSA public key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PublicKey {
    pub n: BigInteger,
    pub e: BigInteger,
}

/// RSA private key, wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    pub n: BigInteger,
    pub e: BigInteger,
    pub d: BigInteger,
    pub p: BigInteger,
    pub q: BigInteger,
    pub dp: BigInteger,
    pub dq: BigInteger,
    pub q_inv: BigInteger,
}

fn check_representative(x: &BigInteger, n: &BigInteger) -> Result<()> {
    if x.is_negative() || x >= n {
        return Err(Error::invalid("message representative out of range"));
    }
    Ok(())
}

impl PublicKey {
    /// [RSAEP][rsaep]
    ///
    /// [rsaep]: https://tools.ietf.org/html/rfc8017#section-5.1.1
    pub fn encryption_primitive(&self, m: &BigInteger) -> Result<BigInteger> {
        check_representative(m, &self.n)?;
        m.mod_pow(&self.e, &self.n)
    }

    /// [RSAVP1][rsavp]
    ///
    /// [rsavp]: https://tools.ietf.org/html/rfc8017#section-5.2.2
    pub fn verification_primitive(&self, s: &BigInteger) -> Result<BigInteger> {
        self.encryption_primitive(s)
    }
}

impl PrivateKey {
    /// Complete a key from its primes, in either order.
    ///
    /// Fails if the primes coincide, or if `e` is not invertible modulo
    /// $(p - 1)(q - 1)$.
    pub fn from_primes(p: BigInteger, q: BigInteger, e: BigInteger) -> Result<Self> {
        if p == q {
            return Err(Error::invalid("RSA primes must differ"));
        }
        let (p, q) = if p < q { (q, p) } else { (p, q) };

        let p_minus_one = p.subtract(&ONE);
        let q_minus_one = q.subtract(&ONE);
        let phi = p_minus_one.multiply(&q_minus_one);
        let d = e.mod_inverse(&phi)?;

        Ok(Self {
            n: p.multiply(&q),
            dp: d.modulo(&p_minus_one)?,
            dq: d.modulo(&q_minus_one)?,
            q_inv: q.mod_inverse(&p)?,
            e,
            d,
            p,
            q,
        })
    }

    /// Generate a key with a modulus of exactly `bits` bits.
    ///
    /// The primes are searched as configured by `options`.
    pub fn generate<R>(bits: usize, e: u32, options: &PrimeOptions, rng: &mut R) -> Result<Self>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        if bits < 2 * MIN_BITS {
            return Err(Error::invalid(format!("cannot generate {}-bit RSA keys", bits)));
        }
        if e < 3 || e % 2 == 0 {
            return Err(Error::invalid(format!("unusable public exponent {}", e)));
        }
        let e = BigInteger::from(e);
        let q_bits = bits / 2;
        let p_bits = bits - q_bits;
        debug!(bits, p_bits, q_bits, "generating RSA key");

        let p = generate_coprime_prime(p_bits, &e, options, rng)?;
        loop {
            let q = generate_coprime_prime(q_bits, &e, options, rng)?;
            if p == q || p.multiply(&q).bit_length() != bits {
                trace!("modulus has the wrong size, drawing another q");
                continue;
            }
            return Self::from_primes(p, q, e);
        }
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey { n: self.n.clone(), e: self.e.clone() }
    }

    /// [RSADP][rsadp], via the Chinese remainder theorem.
    ///
    /// [rsadp]: https://tools.ietf.org/html/rfc8017#section-5.1.2
    pub fn decryption_primitive(&self, c: &BigInteger) -> Result<BigInteger> {
        check_representative(c, &self.n)?;

        // 2.b.i., ii.
        let m1 = c.mod_pow(&self.dp, &self.p)?;
        let m2 = c.mod_pow(&self.dq, &self.q)?;
        // 2.b.iii.
        let h = m1.subtract(&m2).multiply(&self.q_inv).modulo(&self.p)?;
        // 2.b.iv.
        Ok(m2.add(&self.q.multiply(&h)))
    }

    /// [RSASP1][rsasp]
    ///
    /// [rsasp]: https://tools.ietf.org/html/rfc8017#section-5.2.1
    pub fn signature_primitive(&self, m: &BigInteger) -> Result<BigInteger> {
        self.decryption_primitive(m)
    }

    /// Decryption of `c * r^e` for a random unit `r`, unblinded afterwards,
    /// so that the timing of the exponentiations is unrelated to `c`.
    pub fn blinded_decryption_primitive<R>(&self, c: &BigInteger, rng: &mut R) -> Result<BigInteger>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        check_representative(c, &self.n)?;

        let mut r = loop {
            let r = BigInteger::random_below(&self.n, rng)?;
            if !r.is_zero() && r.gcd(&self.n).is_one() {
                break r;
            }
        };
        let blinded = c.multiply(&r.mod_pow(&self.e, &self.n)?).modulo(&self.n)?;
        let m = self.decryption_primitive(&blinded)?;
        let unblinded = m.multiply(&r.mod_inverse(&self.n)?).modulo(&self.n);
        r.zeroize();
        unblinded
    }
}

/// A `bits`-bit probable prime `p` with `gcd(e, p - 1) = 1`.
fn generate_coprime_prime<R>(bits: usize, e: &BigInteger, options: &PrimeOptions, rng: &mut R) -> Result<BigInteger>
where
    R: CryptoRng + RngCore + ?Sized,
{
    loop {
        let p = generate_probable_prime(bits, options, rng)?;
        if e.gcd(&p.subtract(&ONE)).is_one() {
            return Ok(p);
        }
        trace!("p - 1 shares a factor with e, drawing another prime");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures::*;

    fn textbook() -> PrivateKey {
        PrivateKey::from_primes(int("53"), int("61"), int("17")).unwrap()
    }

    #[test]
    fn components() {
        let key = textbook();
        assert_eq!(key.p, int("61"));
        assert_eq!(key.q, int("53"));
        assert_eq!(key.n, int("3233"));
        assert_eq!(key.d, int("2753"));
        assert_eq!(key.dp, int("53"));
        assert_eq!(key.dq, int("49"));
        assert_eq!(key.q_inv, int("38"));
    }

    #[test]
    fn primitives() {
        let key = textbook();
        let public = key.public_key();
        let c = public.encryption_primitive(&int("65")).unwrap();
        assert_eq!(c, int("2790"));
        assert_eq!(key.decryption_primitive(&c).unwrap(), int("65"));

        let s = key.signature_primitive(&int("123")).unwrap();
        assert_eq!(public.verification_primitive(&s).unwrap(), int("123"));

        let mut rng = seeded(89);
        assert_eq!(key.blinded_decryption_primitive(&c, &mut rng).unwrap(), int("65"));
    }

    #[test]
    fn out_of_range() {
        let key = textbook();
        let public = key.public_key();
        assert!(public.encryption_primitive(&int("3233")).is_err());
        assert!(public.encryption_primitive(&int("-1")).is_err());
        assert!(key.decryption_primitive(&int("5000")).is_err());
    }

    #[test]
    fn unusable_primes() {
        assert!(PrivateKey::from_primes(int("61"), int("61"), int("17")).is_err());
        // 3 divides (7 - 1)
        assert_eq!(
            PrivateKey::from_primes(int("7"), int("11"), int("3")).err(),
            Some(Error::Arithmetic("not invertible"))
        );
    }

    #[test]
    fn generated() {
        let mut rng = seeded(97);
        let options = PrimeOptions::default();
        for bits in [64, 255, 256] {
            let key = PrivateKey::generate(bits, DEFAULT_EXPONENT, &options, &mut rng).unwrap();
            assert_eq!(key.n.bit_length(), bits);
            assert!(key.p > key.q);
            assert_eq!(key.p.multiply(&key.q), key.n);

            let m = BigInteger::random_below(&key.n, &mut rng).unwrap();
            let c = key.public_key().encryption_primitive(&m).unwrap();
            assert_eq!(key.decryption_primitive(&c).unwrap(), m);
            assert_eq!(key.blinded_decryption_primitive(&c, &mut rng).unwrap(), m);
            // CRT agrees with the plain exponent
            assert_eq!(c.mod_pow(&key.d, &key.n).unwrap(), m);
        }
    }

    #[test]
    fn invalid_requests() {
        let mut rng = seeded(101);
        let options = PrimeOptions::default();
        assert!(PrivateKey::generate(8, DEFAULT_EXPONENT, &options, &mut rng).is_err());
        assert!(PrivateKey::generate(128, 4, &options, &mut rng).is_err());
        assert!(PrivateKey::generate(128, 1, &options, &mut rng).is_err());
    }
}
