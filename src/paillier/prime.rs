//! Random probable-prime generation for Paillier moduli.

use num_bigint::{BigUint, RandBigInt};
use num_prime::nt_funcs::is_prime;
use num_prime::PrimalityTestConfig;
use rand::{CryptoRng, RngCore};

/// BPSW plus random-base strong probable-prime rounds.
pub fn is_probable_prime(candidate: &BigUint) -> bool {
    is_prime(candidate, Some(PrimalityTestConfig::default())).probably()
}

/// Random prime of exactly `bits` bits with the two top bits set, so the
/// product of two such primes has exactly `2 * bits` bits.
pub(crate) fn generate_prime<R: RngCore + CryptoRng + ?Sized>(bits: usize, rng: &mut R) -> BigUint {
    let bits = bits as u64;
    loop {
        let mut candidate = rng.gen_biguint(bits);
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(bits - 2, true);
        candidate.set_bit(0, true);

        if is_probable_prime(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_known_primes_and_composites() {
        // 2^127 - 1 (Mersenne prime)
        let m127 = (BigUint::from(1u32) << 127) - 1u32;
        assert!(is_probable_prime(&m127));

        // Carmichael number 561 fools a single Fermat witness
        assert!(!is_probable_prime(&BigUint::from(561u32)));

        // Product of two primes
        let composite = BigUint::from(1_000_003u64) * BigUint::from(999_983u64);
        assert!(!is_probable_prime(&composite));
    }

    #[test]
    fn test_generated_prime_shape() {
        let prime = generate_prime(128, &mut OsRng);
        assert_eq!(prime.bits(), 128);
        assert!(prime.bit(126));
        assert!(prime.bit(0));
        assert!(is_probable_prime(&prime));
    }
}
