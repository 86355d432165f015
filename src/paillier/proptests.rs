//! Property-based tests for Paillier
//!
//! Tests for:
//! - Round trip: Dec(Enc(m)) == m
//! - Homomorphism: Dec(Enc(a) ⊕ Enc(b)) == (a + b) mod n

use super::KeyPair;
use num_bigint::BigUint;
use proptest::prelude::*;
use rand::rngs::OsRng;
use std::sync::OnceLock;

fn keypair() -> &'static KeyPair {
    static KEYPAIR: OnceLock<KeyPair> = OnceLock::new();
    KEYPAIR.get_or_init(|| KeyPair::generate(512, &mut OsRng).unwrap())
}

// Uniform-ish plaintext in [0, n)
fn plaintext(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes) % keypair().public_key().modulus()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property test: Round trip
    #[test]
    fn prop_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 1..80)) {
        let pair = keypair();
        let m = plaintext(&bytes);

        let c = pair.public_key().encrypt(&m, &mut OsRng).unwrap();
        prop_assert_eq!(pair.decrypt(&c).unwrap(), m);
    }

    /// Property test: Homomorphic addition
    #[test]
    fn prop_homomorphic_sum(
        a in proptest::collection::vec(any::<u8>(), 1..80),
        b in proptest::collection::vec(any::<u8>(), 1..80),
    ) {
        let pair = keypair();
        let public = pair.public_key();
        let a = plaintext(&a);
        let b = plaintext(&b);

        let ca = public.encrypt(&a, &mut OsRng).unwrap();
        let cb = public.encrypt(&b, &mut OsRng).unwrap();
        let sum = public.combine(&ca, &cb).unwrap();

        prop_assert_eq!(pair.decrypt(&sum).unwrap(), (a + b) % public.modulus());
    }

    /// Property test: Counts summed one by one
    #[test]
    fn prop_count_aggregation(counts in proptest::collection::vec(any::<u32>(), 1..8)) {
        let pair = keypair();
        let public = pair.public_key();

        let mut encrypted = counts
            .iter()
            .map(|count| public.encrypt(&BigUint::from(*count), &mut OsRng).unwrap());
        let first = encrypted.next().unwrap();
        let total = encrypted.fold(first, |acc, c| public.combine(&acc, &c).unwrap());

        let expected: u64 = counts.iter().map(|c| *c as u64).sum();
        prop_assert_eq!(pair.decrypt(&total).unwrap(), BigUint::from(expected));
    }
}
