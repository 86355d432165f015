//! Property-based tests for the curve group
//!
//! Tests for:
//! - Group law: identity, inverses, order
//! - Commutativity of scalar multiplication (the blinding property)
//! - Hash-to-curve determinism and validity

use super::{CurveGroup, CurveName, CurvePoint};
use num_bigint::BigUint;
use proptest::prelude::*;

fn sm2() -> CurveGroup {
    CurveGroup::named(CurveName::Sm2p256v1).unwrap()
}

// Random non-infinite point: k·G for a nonzero scalar
fn random_point(group: &CurveGroup, seed: &[u8; 32]) -> CurvePoint {
    let k = BigUint::from_bytes_be(seed) % group.order();
    let k = if k == BigUint::from(0u32) {
        BigUint::from(1u32)
    } else {
        k
    };
    group.scalar_mul(&k, group.generator()).unwrap()
}

proptest! {
    // Scalar multiplications are slow in debug builds
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Property test: Commutative blinding
    /// k2·(k1·P) == k1·(k2·P)
    #[test]
    fn prop_scalar_mul_commutes(
        k1 in any::<[u8; 32]>(),
        k2 in any::<[u8; 32]>(),
        data in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let group = sm2();
        let point = group.hash_to_curve(&data).unwrap();
        let k1 = BigUint::from_bytes_be(&k1);
        let k2 = BigUint::from_bytes_be(&k2);

        let left = group.scalar_mul(&k2, &group.scalar_mul(&k1, &point).unwrap()).unwrap();
        let right = group.scalar_mul(&k1, &group.scalar_mul(&k2, &point).unwrap()).unwrap();

        prop_assert_eq!(left, right);
    }

    /// Property test: Group law
    /// P + O == P, P + (-P) == O, n·P == O
    #[test]
    fn prop_group_law(seed in any::<[u8; 32]>()) {
        let group = sm2();
        let point = random_point(&group, &seed);

        prop_assert_eq!(group.add(&point, &CurvePoint::Infinity).unwrap(), point.clone());
        prop_assert!(group.add(&point, &group.negate(&point)).unwrap().is_infinity());

        let n_minus_one = group.order() - 1u32;
        let almost = group.scalar_mul(&n_minus_one, &point).unwrap();
        prop_assert!(group.add(&almost, &point).unwrap().is_infinity());
    }

    /// Property test: Closure
    /// Sums and multiples of valid points stay on the curve
    #[test]
    fn prop_results_on_curve(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        let group = sm2();
        let p = random_point(&group, &a);
        let q = random_point(&group, &b);

        prop_assert!(group.is_on_curve(&group.add(&p, &q).unwrap()));
        prop_assert!(group.is_on_curve(&group.add(&p, &p).unwrap()));
    }

    /// Property test: Hash-to-curve determinism and validity
    #[test]
    fn prop_hash_to_curve_valid(data in proptest::collection::vec(any::<u8>(), 0..128)) {
        for name in [CurveName::Sm2p256v1, CurveName::Secp256k1] {
            let group = CurveGroup::named(name).unwrap();
            let first = group.hash_to_curve(&data).unwrap();
            let second = group.hash_to_curve(&data).unwrap();

            prop_assert!(!first.is_infinity());
            prop_assert!(group.is_on_curve(&first));
            prop_assert_eq!(first, second);
        }
    }
}
