//! Prime-order elliptic-curve group used for commutative blinding
//!
//! Points live on a short Weierstrass curve y² = x³ + ax + b over GF(p) with
//! p ≡ 3 (mod 4), which makes the square root needed by hash-to-curve a
//! single exponentiation.
//!
//! # Blinding
//!
//! The protocol only relies on `scalar_mul` commuting:
//! `k2·(k1·P) == k1·(k2·P)`. Two parties each applying their own secret
//! scalar end up with comparable points without ever exchanging scalars.
//!
//! # Hardening notes
//!
//! - Arithmetic is variable-time (`num-bigint`); not side-channel resistant.
//! - A non-invertible slope denominator is reported as
//!   [`CurveError::DegenerateGroupOperation`] instead of being mapped to the
//!   point at infinity.
//! - `hash_to_curve` gives up after a bounded number of re-hashes.

pub mod params;

#[cfg(test)]
mod proptests;

pub use params::{CurveName, CurveParameters};

use num_bigint::BigUint;
use num_traits::{One, Zero};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Default cap on hash-to-curve re-hash attempts (failure odds ≈ 2^-64)
pub const DEFAULT_HASH_TO_CURVE_ATTEMPTS: u32 = 64;

/// Curve arithmetic errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CurveError {
    #[error("Point is not on the curve")]
    InvalidCurvePoint,

    #[error("Hash-to-curve found no valid point after {attempts} attempts")]
    HashToCurveExhausted { attempts: u32 },

    #[error("Degenerate group operation: slope denominator is not invertible")]
    DegenerateGroupOperation,

    #[error("Unsupported curve parameters: {0}")]
    UnsupportedParameters(String),
}

/// A curve point in affine coordinates, or the point at infinity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CurvePoint {
    Infinity,
    Affine { x: BigUint, y: BigUint },
}

impl CurvePoint {
    pub fn is_infinity(&self) -> bool {
        matches!(self, CurvePoint::Infinity)
    }

    /// Affine coordinates, `None` for infinity
    pub fn coordinates(&self) -> Option<(&BigUint, &BigUint)> {
        match self {
            CurvePoint::Infinity => None,
            CurvePoint::Affine { x, y } => Some((x, y)),
        }
    }
}

/// Curve context: validated parameters plus derived constants.
///
/// Several groups (e.g. a test curve and a production curve) can coexist;
/// nothing here is global.
#[derive(Debug, Clone)]
pub struct CurveGroup {
    params: CurveParameters,
    generator: CurvePoint,
    /// (p + 1) / 4
    sqrt_exponent: BigUint,
    hash_attempts: u32,
}

impl CurveGroup {
    /// Bind curve parameters into a group context.
    ///
    /// Rejects parameters the arithmetic below cannot serve: p ≢ 3 (mod 4),
    /// a singular curve, or a generator that is not on the curve.
    pub fn new(params: CurveParameters) -> Result<Self, CurveError> {
        let p = &params.p;
        let four = BigUint::from(4u32);

        if p % &four != BigUint::from(3u32) {
            return Err(CurveError::UnsupportedParameters(format!(
                "{}: field prime must be 3 mod 4",
                params.name
            )));
        }

        let discriminant = (&params.a * &params.a * &params.a * 4u32
            + &params.b * &params.b * 27u32)
            % p;
        if discriminant.is_zero() {
            return Err(CurveError::UnsupportedParameters(format!(
                "{}: singular curve",
                params.name
            )));
        }

        if params.n <= BigUint::one() {
            return Err(CurveError::UnsupportedParameters(format!(
                "{}: group order must exceed 1",
                params.name
            )));
        }

        let sqrt_exponent = (p + 1u32) / &four;
        let mut group = Self {
            generator: CurvePoint::Infinity,
            sqrt_exponent,
            hash_attempts: DEFAULT_HASH_TO_CURVE_ATTEMPTS,
            params,
        };

        let generator = group
            .point(group.params.gx.clone(), group.params.gy.clone())
            .map_err(|_| {
                CurveError::UnsupportedParameters(format!(
                    "{}: generator is not on the curve",
                    group.params.name
                ))
            })?;
        group.generator = generator;

        Ok(group)
    }

    /// Group for a built-in named curve
    pub fn named(name: CurveName) -> Result<Self, CurveError> {
        Self::new(name.parameters())
    }

    /// Override the hash-to-curve retry cap
    pub fn with_hash_attempts(mut self, attempts: u32) -> Self {
        self.hash_attempts = attempts;
        self
    }

    pub fn parameters(&self) -> &CurveParameters {
        &self.params
    }

    pub fn generator(&self) -> &CurvePoint {
        &self.generator
    }

    /// Prime group order n
    pub fn order(&self) -> &BigUint {
        &self.params.n
    }

    pub fn hash_attempts(&self) -> u32 {
        self.hash_attempts
    }

    /// Validated constructor for affine points.
    pub fn point(&self, x: BigUint, y: BigUint) -> Result<CurvePoint, CurveError> {
        let candidate = CurvePoint::Affine { x, y };
        if self.is_on_curve(&candidate) {
            Ok(candidate)
        } else {
            Err(CurveError::InvalidCurvePoint)
        }
    }

    /// Checks reduced coordinates and y² ≡ x³ + ax + b (mod p).
    pub fn is_on_curve(&self, point: &CurvePoint) -> bool {
        match point {
            CurvePoint::Infinity => true,
            CurvePoint::Affine { x, y } => {
                let p = &self.params.p;
                x < p && y < p && (y * y) % p == self.curve_rhs(x)
            }
        }
    }

    pub fn negate(&self, point: &CurvePoint) -> CurvePoint {
        match point {
            CurvePoint::Infinity => CurvePoint::Infinity,
            CurvePoint::Affine { x, y } => CurvePoint::Affine {
                x: x.clone(),
                y: self.field_sub(&BigUint::zero(), y),
            },
        }
    }

    /// Point addition (chord-and-tangent).
    pub fn add(&self, lhs: &CurvePoint, rhs: &CurvePoint) -> Result<CurvePoint, CurveError> {
        let (x1, y1) = match lhs {
            CurvePoint::Infinity => return Ok(rhs.clone()),
            CurvePoint::Affine { x, y } => (x, y),
        };
        let (x2, y2) = match rhs {
            CurvePoint::Infinity => return Ok(lhs.clone()),
            CurvePoint::Affine { x, y } => (x, y),
        };

        let p = &self.params.p;

        if x1 == x2 && ((y1 + y2) % p).is_zero() {
            return Ok(CurvePoint::Infinity);
        }

        let (numerator, denominator) = if x1 == x2 && y1 == y2 {
            ((x1 * x1 * 3u32 + &self.params.a) % p, (y1 * 2u32) % p)
        } else {
            (self.field_sub(y2, y1), self.field_sub(x2, x1))
        };

        let inverse = denominator
            .modinv(p)
            .ok_or(CurveError::DegenerateGroupOperation)?;
        let slope = (numerator * inverse) % p;

        let x3 = self.field_sub(&self.field_sub(&(&slope * &slope), x1), x2);
        let y3 = self.field_sub(&(&slope * self.field_sub(x1, &x3)), y1);

        Ok(CurvePoint::Affine { x: x3, y: y3 })
    }

    /// Double-and-add over the bits of `k mod n`.
    pub fn scalar_mul(&self, k: &BigUint, point: &CurvePoint) -> Result<CurvePoint, CurveError> {
        let k = k % &self.params.n;
        if k.is_zero() || point.is_infinity() {
            return Ok(CurvePoint::Infinity);
        }

        let mut result = CurvePoint::Infinity;
        let mut addend = point.clone();
        let bits = k.bits();
        for i in 0..bits {
            if k.bit(i) {
                result = self.add(&result, &addend)?;
            }
            if i + 1 < bits {
                addend = self.add(&addend, &addend)?;
            }
        }

        Ok(result)
    }

    /// Deterministic map from bytes to a curve point.
    ///
    /// x = H(data) mod p; if x³ + ax + b has no square root the digest is
    /// re-hashed, at most `hash_attempts` times.
    pub fn hash_to_curve(&self, data: &[u8]) -> Result<CurvePoint, CurveError> {
        let p = &self.params.p;
        let mut digest = Sha256::digest(data);

        for _ in 0..self.hash_attempts {
            let x = BigUint::from_bytes_be(digest.as_slice()) % p;
            let rhs = self.curve_rhs(&x);
            let y = rhs.modpow(&self.sqrt_exponent, p);

            if (&y * &y) % p == rhs {
                return Ok(CurvePoint::Affine { x, y });
            }

            digest = Sha256::digest(digest.as_slice());
        }

        Err(CurveError::HashToCurveExhausted {
            attempts: self.hash_attempts,
        })
    }

    fn curve_rhs(&self, x: &BigUint) -> BigUint {
        let p = &self.params.p;
        (x * x * x + &self.params.a * x + &self.params.b) % p
    }

    /// (a - b) mod p for any a, b
    fn field_sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let p = &self.params.p;
        ((a % p) + p - (b % p)) % p
    }
}
