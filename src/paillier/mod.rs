//! Paillier additively homomorphic encryption
//!
//! Used by the breach server to encrypt per-record occurrence counts so the
//! client can sum the counts of matching records without learning them.
//!
//! - `c = g^m · r^n mod n²` with `g = n + 1`
//! - `Dec(c1 · c2 mod n²) = m1 + m2 mod n`
//!
//! Primes are checked with `num-prime` (BPSW + random bases) rather than a
//! single Fermat witness.

pub mod prime;

#[cfg(test)]
mod proptests;

use crate::serialization::{from_cbor, to_cbor};
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Smallest accepted modulus size
pub const MIN_KEY_BITS: usize = 256;

/// Default modulus size for long-lived server keys
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Key generation gives up after this many prime pairs
const MAX_KEYGEN_ATTEMPTS: usize = 16;

/// Paillier errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaillierError {
    #[error("Plaintext must be smaller than the public modulus")]
    PlaintextOutOfRange,

    #[error("Ciphertext outside [1, n^2)")]
    InvalidCiphertextRange,

    #[error("Ciphertext does not decrypt under this key")]
    MalformedCiphertext,

    #[error("Invalid key size {0}: must be even and at least 256 bits")]
    InvalidKeySize(usize),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),
}

/// Public key (n, g = n + 1). Serialized as the modulus alone.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BigUint", into = "BigUint")]
pub struct PublicKey {
    n: BigUint,
    g: BigUint,
    n_squared: BigUint,
}

impl PublicKey {
    /// Public key for modulus `n`.
    pub fn from_modulus(n: BigUint) -> Result<Self, PaillierError> {
        if (n.bits() as usize) < MIN_KEY_BITS || !n.bit(0) {
            return Err(PaillierError::InvalidKeyMaterial(format!(
                "modulus must be odd and at least {MIN_KEY_BITS} bits"
            )));
        }

        Ok(Self {
            g: &n + 1u32,
            n_squared: &n * &n,
            n,
        })
    }

    /// Modulus n
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// Generator g = n + 1
    pub fn generator(&self) -> &BigUint {
        &self.g
    }

    pub fn modulus_squared(&self) -> &BigUint {
        &self.n_squared
    }

    /// Bit length of n
    pub fn bits(&self) -> usize {
        self.n.bits() as usize
    }

    /// Draw the encryption randomness r uniformly from [1, n - 1].
    pub fn sample_nonce<R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R) -> Nonce {
        Nonce(rng.gen_biguint_range(&BigUint::one(), &self.n))
    }

    /// Encrypt `m` with fresh randomness. `m >= n` is rejected before any
    /// randomness is drawn.
    pub fn encrypt<R: RngCore + CryptoRng + ?Sized>(
        &self,
        m: &BigUint,
        rng: &mut R,
    ) -> Result<Ciphertext, PaillierError> {
        self.check_plaintext(m)?;
        let nonce = self.sample_nonce(rng);
        self.encrypt_with_nonce(m, &nonce)
    }

    /// Encrypt with caller-drawn randomness. A nonce must never be reused.
    pub fn encrypt_with_nonce(&self, m: &BigUint, nonce: &Nonce) -> Result<Ciphertext, PaillierError> {
        self.check_plaintext(m)?;
        let gm = self.g.modpow(m, &self.n_squared);
        let rn = nonce.0.modpow(&self.n, &self.n_squared);
        Ok(Ciphertext((gm * rn) % &self.n_squared))
    }

    /// Homomorphic addition: the result decrypts to (m1 + m2) mod n.
    pub fn combine(&self, c1: &Ciphertext, c2: &Ciphertext) -> Result<Ciphertext, PaillierError> {
        self.check_ciphertext(c1)?;
        self.check_ciphertext(c2)?;
        Ok(Ciphertext((&c1.0 * &c2.0) % &self.n_squared))
    }

    fn check_plaintext(&self, m: &BigUint) -> Result<(), PaillierError> {
        if m >= &self.n {
            return Err(PaillierError::PlaintextOutOfRange);
        }
        Ok(())
    }

    fn check_ciphertext(&self, c: &Ciphertext) -> Result<(), PaillierError> {
        if c.0.is_zero() || c.0 >= self.n_squared {
            return Err(PaillierError::InvalidCiphertextRange);
        }
        Ok(())
    }
}

impl TryFrom<BigUint> for PublicKey {
    type Error = PaillierError;

    fn try_from(n: BigUint) -> Result<Self, Self::Error> {
        Self::from_modulus(n)
    }
}

impl From<PublicKey> for BigUint {
    fn from(key: PublicKey) -> Self {
        key.n
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({} bits)", self.bits())
    }
}

/// Private key (λ, μ). Never leaves the server.
#[derive(Clone, Serialize, Deserialize)]
pub struct PrivateKey {
    lambda: BigUint,
    mu: BigUint,
}

impl PrivateKey {
    /// m = L(c^λ mod n²) · μ mod n, with L(x) = (x - 1) / n.
    ///
    /// Ciphertexts not produced by `encrypt`/`combine` yield garbage or
    /// `MalformedCiphertext`, never a panic.
    pub fn decrypt(&self, public: &PublicKey, c: &Ciphertext) -> Result<BigUint, PaillierError> {
        public.check_ciphertext(c)?;

        let u = c.0.modpow(&self.lambda, &public.n_squared);
        if u.is_zero() {
            return Err(PaillierError::MalformedCiphertext);
        }

        let l = (u - 1u32) / &public.n;
        Ok((l * &self.mu) % &public.n)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

/// Server key pair, created once and shared read-only across sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPair {
    public: PublicKey,
    private: PrivateKey,
}

impl KeyPair {
    /// Generate a key pair with a `bits`-bit modulus.
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(
        bits: usize,
        rng: &mut R,
    ) -> Result<Self, PaillierError> {
        if bits < MIN_KEY_BITS || bits % 2 != 0 {
            return Err(PaillierError::InvalidKeySize(bits));
        }

        for _ in 0..MAX_KEYGEN_ATTEMPTS {
            let p = prime::generate_prime(bits / 2, rng);
            let mut q = prime::generate_prime(bits / 2, rng);
            while p == q {
                q = prime::generate_prime(bits / 2, rng);
            }

            let n = &p * &q;
            let lambda = (&p - 1u32) * (&q - 1u32);
            let Some(mu) = lambda.modinv(&n) else {
                continue;
            };

            let public = PublicKey::from_modulus(n)?;
            return Ok(Self {
                public,
                private: PrivateKey { lambda, mu },
            });
        }

        Err(PaillierError::KeyGeneration(format!(
            "no usable prime pair after {MAX_KEYGEN_ATTEMPTS} attempts"
        )))
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn decrypt(&self, c: &Ciphertext) -> Result<BigUint, PaillierError> {
        self.private.decrypt(&self.public, c)
    }

    /// Encode for storage (contains the private key).
    pub fn to_cbor(&self) -> Result<Vec<u8>, PaillierError> {
        to_cbor(self).map_err(|e| PaillierError::InvalidKeyMaterial(e.to_string()))
    }

    /// Decode a stored key pair and check λ·μ ≡ 1 (mod n).
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, PaillierError> {
        let pair: KeyPair =
            from_cbor(bytes).map_err(|e| PaillierError::InvalidKeyMaterial(e.to_string()))?;

        let n = &pair.public.n;
        if (&pair.private.lambda * &pair.private.mu) % n != BigUint::one() {
            return Err(PaillierError::InvalidKeyMaterial(
                "private key does not match public modulus".to_string(),
            ));
        }

        Ok(pair)
    }
}

/// Encryption randomness r ∈ [1, n - 1]
pub struct Nonce(BigUint);

/// Paillier ciphertext, an element of [1, n²) for valid encryptions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ciphertext(BigUint);

impl Ciphertext {
    /// Wrap a raw integer received off the wire. Range is checked on use.
    pub fn from_biguint(value: BigUint) -> Self {
        Self(value)
    }

    pub fn into_biguint(self) -> BigUint {
        self.0
    }
}
