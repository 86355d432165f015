//! In-process driver running all four rounds between a client and a server
//!
//! Every message goes through its CBOR wire encoding, exactly as it would
//! between two processes. Transport is left to the caller; this driver is
//! what the CLI, the integration tests and the benchmarks use.

use super::client::Client;
use super::messages::{AggregateMessage, BlindedCredentials, ServerResponse, WireMessage};
use super::server::Server;
use super::PsiError;
use rand::{CryptoRng, RngCore};
use std::time::{Duration, Instant};
use tracing::{info, info_span, warn};
use uuid::Uuid;

/// Result of a completed session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub session_id: Uuid,
    /// Aggregate occurrence count over all matching breach records
    pub leaked_occurrences: u128,
    /// Total bytes of the three protocol messages
    pub wire_bytes: usize,
    pub elapsed: Duration,
}

/// Run one complete session. Any error aborts with no result.
pub fn run_session<R: RngCore + CryptoRng + ?Sized>(
    client: &Client,
    server: &Server,
    rng: &mut R,
) -> Result<SessionOutcome, PsiError> {
    let session_id = Uuid::new_v4();
    let span = info_span!("psi_session", %session_id);
    let _guard = span.enter();

    let started = Instant::now();
    match exchange(client, server, rng) {
        Ok((leaked_occurrences, wire_bytes)) => {
            let elapsed = started.elapsed();
            info!(
                credentials = client.credential_count(),
                records = server.record_count(),
                wire_bytes,
                ?elapsed,
                "session complete"
            );
            Ok(SessionOutcome {
                session_id,
                leaked_occurrences,
                wire_bytes,
                elapsed,
            })
        }
        Err(e) => {
            warn!(error = %e, "session aborted");
            Err(e)
        }
    }
}

fn exchange<R: RngCore + CryptoRng + ?Sized>(
    client: &Client,
    server: &Server,
    rng: &mut R,
) -> Result<(u128, usize), PsiError> {
    let (client_state, msg1) = client.blind_credentials(rng)?;
    let msg1 = msg1.to_bytes()?;

    let (server_state, msg2) = server.respond(&BlindedCredentials::from_bytes(&msg1)?, rng)?;
    let msg2 = msg2.to_bytes()?;

    let msg3 = client_state.aggregate(&ServerResponse::from_bytes(&msg2)?, rng)?;
    let msg3 = msg3.to_bytes()?;

    let total = server_state.finish(&AggregateMessage::from_bytes(&msg3)?)?;
    Ok((total, msg1.len() + msg2.len() + msg3.len()))
}
