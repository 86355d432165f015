//! Private Set Intersection with Sum (PSI-sum) for breach lookups
//!
//! A client learns how often its credentials occur in a server's breach
//! database. Neither side learns which records matched; only the server
//! learns the aggregate count.
//!
//! # Protocol Overview
//!
//! 1. **Round 1** (client): blind H(c) with k1 for every credential, shuffle, send
//! 2. **Round 2** (server): blind the client points with k2 and shuffle; blind
//!    H(d) with k2 for every record, pair with Enc(count), shuffle the pairs
//! 3. **Round 3** (client): apply k1 to the server points, keep the
//!    ciphertexts whose point is in the client's doubly-blinded set, sum them
//!    homomorphically; send the sum or the zero-match sentinel
//! 4. **Round 4** (server): decrypt the sum (or return 0 for the sentinel)
//!
//! # Security Properties
//!
//! - **Commutative Blinding**: k2·(k1·P) = k1·(k2·P), so equal credentials
//!   match without either scalar leaving its owner
//! - **Two Independent Shuffles**: break positional links between wire
//!   entries and source indices
//! - **Sum Only**: matched counts are aggregated under encryption
//! - **Ephemeral Scalars**: consumed by the round that last needs them
//!   and wiped on drop
//!
//! Rounds are consuming state transitions ([`client::Client`] →
//! [`client::ClientAwaitingResponse`], [`server::Server`] →
//! [`server::ServerAwaitingAggregate`]), so a later round cannot run before
//! an earlier one has produced its message.

pub mod client;
mod deadline;
pub mod messages;
pub mod scalar;
pub mod server;
pub mod session;

pub use client::{Client, ClientAwaitingResponse};
pub use messages::{
    AggregateMessage, BlindedCredentials, EncodedPoint, LeakUnit, ServerResponse, WireMessage,
};
pub use server::{Server, ServerAwaitingAggregate};
pub use session::{run_session, SessionOutcome};

use crate::curve::{CurveError, CurveGroup, CurveName, DEFAULT_HASH_TO_CURVE_ATTEMPTS};
use crate::paillier::{PaillierError, DEFAULT_KEY_BITS};
use crate::serialization::SerializationError;
use rand::seq::SliceRandom;
use rand::{CryptoRng, RngCore};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// PSI-sum protocol errors. Every variant aborts the session.
#[derive(Debug, Error)]
pub enum PsiError {
    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Paillier(#[from] PaillierError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error("{round} exceeded its {limit:?} deadline")]
    RoundTimeout { round: Round, limit: Duration },

    #[error("Decrypted aggregate does not fit in 128 bits")]
    AggregateOutOfRange,
}

/// Protocol rounds, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Round {
    BlindCredentials,
    Respond,
    Aggregate,
    Reveal,
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Round::BlindCredentials => write!(f, "round 1 (client blinding)"),
            Round::Respond => write!(f, "round 2 (server response)"),
            Round::Aggregate => write!(f, "round 3 (client aggregation)"),
            Round::Reveal => write!(f, "round 4 (server reveal)"),
        }
    }
}

/// Domain parameters both parties agree on before a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    pub curve: CurveName,
    /// Paillier modulus size
    pub key_bits: usize,
    pub hash_to_curve_attempts: u32,
    /// Abort a round that runs longer than this
    pub round_timeout: Option<Duration>,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            curve: CurveName::default(),
            key_bits: DEFAULT_KEY_BITS,
            hash_to_curve_attempts: DEFAULT_HASH_TO_CURVE_ATTEMPTS,
            round_timeout: None,
        }
    }
}

impl ProtocolConfig {
    /// Curve context with this config's hash-to-curve cap
    pub fn curve_group(&self) -> Result<CurveGroup, CurveError> {
        Ok(CurveGroup::named(self.curve)?.with_hash_attempts(self.hash_to_curve_attempts))
    }
}

/// Shuffle a fully materialised list with a CSPRNG.
pub(crate) fn shuffle<T, R: RngCore + CryptoRng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}
