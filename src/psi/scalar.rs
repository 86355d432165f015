//! Ephemeral blinding scalars

use crate::curve::{CurveError, CurveGroup, CurvePoint};
use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::{CryptoRng, RngCore};
use std::fmt;
use zeroize::Zeroizing;

/// Per-session secret exponent k ∈ [1, n - 1].
///
/// Held as big-endian bytes so the backing memory is wiped on drop. Never
/// serialized, never reused across sessions.
pub struct BlindingScalar {
    bytes: Zeroizing<Vec<u8>>,
}

impl BlindingScalar {
    /// Draw a fresh scalar for a group of order `order`.
    pub fn random<R: RngCore + CryptoRng + ?Sized>(order: &BigUint, rng: &mut R) -> Self {
        let k = rng.gen_biguint_range(&BigUint::one(), order);
        Self {
            bytes: Zeroizing::new(k.to_bytes_be()),
        }
    }

    /// k·P
    pub fn blind(&self, group: &CurveGroup, point: &CurvePoint) -> Result<CurvePoint, CurveError> {
        let k = BigUint::from_bytes_be(&self.bytes);
        group.scalar_mul(&k, point)
    }
}

impl fmt::Debug for BlindingScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BlindingScalar(..)")
    }
}
