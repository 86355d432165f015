//! Wire messages exchanged between client and server
//!
//! | Message | Direction | Content |
//! |---------|-----------|---------|
//! | [`BlindedCredentials`] | client → server | k1·H(c) per credential, shuffled |
//! | [`ServerResponse`] | server → client | k2·k1·H(c) shuffled; (k2·H(d), Enc(count)) units shuffled |
//! | [`AggregateMessage`] | client → server | one big integer: Σ Enc(count) or 0 |
//!
//! Lists carry no index semantics after shuffling. All messages encode to
//! CBOR via [`WireMessage`]. Big integers (coordinates, ciphertexts) use
//! num-bigint's serde form: a CBOR array of u32 limbs, least significant
//! first, with zero as the empty array.

use crate::curve::{CurveError, CurveGroup, CurvePoint};
use crate::paillier::Ciphertext;
use crate::serialization::{from_cbor, to_cbor, SerializationError};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// CBOR encoding shared by all protocol messages
pub trait WireMessage: Serialize + DeserializeOwned {
    fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        to_cbor(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
        from_cbor(bytes)
    }
}

/// Affine (x, y) pair as sent on the wire. Infinity is not representable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodedPoint {
    pub x: BigUint,
    pub y: BigUint,
}

impl EncodedPoint {
    /// Encode a finite point; the point at infinity never appears in a
    /// well-formed run and is rejected.
    pub fn from_point(point: &CurvePoint) -> Result<Self, CurveError> {
        let (x, y) = point.coordinates().ok_or(CurveError::InvalidCurvePoint)?;
        Ok(Self {
            x: x.clone(),
            y: y.clone(),
        })
    }

    /// Decode and validate against the curve equation.
    pub fn decode(&self, group: &CurveGroup) -> Result<CurvePoint, CurveError> {
        group.point(self.x.clone(), self.y.clone())
    }
}

/// Msg1: the client's singly-blinded credential points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlindedCredentials {
    pub points: Vec<EncodedPoint>,
}

impl WireMessage for BlindedCredentials {}

/// A server record after blinding: point and encrypted count travel together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakUnit {
    pub point: EncodedPoint,
    pub count: Ciphertext,
}

/// Msg2: two independently shuffled lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerResponse {
    /// Client points with both blinding layers applied
    pub client_points: Vec<EncodedPoint>,
    /// Server records blinded with k2, paired with encrypted counts
    pub leak_units: Vec<LeakUnit>,
}

impl WireMessage for ServerResponse {}

/// Msg3: the encrypted aggregate, or the zero-match sentinel.
///
/// Encoded as one big integer (a u32-limb array, see the module docs). 0 is
/// never a valid Paillier ciphertext, so it doubles as the sentinel and goes
/// on the wire as the empty array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BigUint", into = "BigUint")]
pub enum AggregateMessage {
    NoMatches,
    Encrypted(Ciphertext),
}

impl From<BigUint> for AggregateMessage {
    fn from(value: BigUint) -> Self {
        if value.is_zero() {
            AggregateMessage::NoMatches
        } else {
            AggregateMessage::Encrypted(Ciphertext::from_biguint(value))
        }
    }
}

impl From<AggregateMessage> for BigUint {
    fn from(message: AggregateMessage) -> Self {
        match message {
            AggregateMessage::NoMatches => BigUint::zero(),
            AggregateMessage::Encrypted(c) => c.into_biguint(),
        }
    }
}

impl WireMessage for AggregateMessage {}
