//! leakcheck - Private Breach Lookup
//!
//! Counts how often a client's credentials appear in a server's breach
//! database without either side revealing its set.
//!
//! Building blocks:
//! - `curve`: prime-order elliptic-curve group for commutative blinding
//! - `paillier`: additively homomorphic encryption for count aggregation
//! - `psi`: the four-round PSI-sum protocol between client and server
//!
//! Only the final aggregate is revealed, and only to the server.

pub mod credential;
pub mod curve;
pub mod paillier;
pub mod psi;
pub mod serialization;

pub use credential::{Credential, CredentialHash, LeakRecord};
pub use psi::{run_session, Client, ProtocolConfig, PsiError, Server, SessionOutcome};
