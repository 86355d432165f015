//! Server role: holds the breach database, the Paillier key pair and a
//! per-session k2

use super::deadline::RoundDeadline;
use super::messages::{AggregateMessage, BlindedCredentials, EncodedPoint, LeakUnit, ServerResponse};
use super::scalar::BlindingScalar;
use super::{shuffle, PsiError, Round};
use crate::credential::LeakRecord;
use crate::curve::CurveGroup;
use crate::paillier::{KeyPair, Nonce, PaillierError, PublicKey};
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rand::{CryptoRng, RngCore};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Breach-database server.
///
/// Cheap to clone; the curve, key pair and records are shared read-only
/// between concurrent sessions.
#[derive(Debug, Clone)]
pub struct Server {
    group: Arc<CurveGroup>,
    keypair: Arc<KeyPair>,
    records: Arc<[LeakRecord]>,
    round_timeout: Option<Duration>,
}

impl Server {
    pub fn new(
        group: Arc<CurveGroup>,
        keypair: Arc<KeyPair>,
        records: impl Into<Arc<[LeakRecord]>>,
    ) -> Self {
        Self {
            group,
            keypair,
            records: records.into(),
            round_timeout: None,
        }
    }

    pub fn with_round_timeout(mut self, round_timeout: Option<Duration>) -> Self {
        self.round_timeout = round_timeout;
        self
    }

    /// Published to clients before a session
    pub fn public_key(&self) -> &PublicKey {
        self.keypair.public_key()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Round 2: double-blind the client's points and send blinded,
    /// encrypted records. k2 is dropped when this returns.
    pub fn respond<R: RngCore + CryptoRng + ?Sized>(
        &self,
        request: &BlindedCredentials,
        rng: &mut R,
    ) -> Result<(ServerAwaitingAggregate, ServerResponse), PsiError> {
        let deadline = RoundDeadline::start(Round::Respond, self.round_timeout);
        let group = self.group.as_ref();
        let public = self.keypair.public_key();
        let records: &[LeakRecord] = &self.records;

        // Plaintexts are range-checked before any randomness is drawn
        let counts = records
            .iter()
            .map(|record| {
                let count = BigUint::from(record.occurrences);
                if &count >= public.modulus() {
                    return Err(PaillierError::PlaintextOutOfRange);
                }
                Ok(count)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let scalar = BlindingScalar::random(group.order(), rng);
        let nonces: Vec<Nonce> = counts.iter().map(|_| public.sample_nonce(rng)).collect();

        let mut client_points = request
            .points
            .par_iter()
            .map(|encoded| -> Result<EncodedPoint, PsiError> {
                deadline.check()?;
                let point = encoded.decode(group)?;
                Ok(EncodedPoint::from_point(&scalar.blind(group, &point)?)?)
            })
            .collect::<Result<Vec<_>, PsiError>>()?;

        let mut leak_units = records
            .par_iter()
            .zip(counts.par_iter())
            .zip(nonces.par_iter())
            .map(|((record, count), nonce)| -> Result<LeakUnit, PsiError> {
                deadline.check()?;
                let point = group.hash_to_curve(record.hash.as_bytes())?;
                let blinded = scalar.blind(group, &point)?;
                Ok(LeakUnit {
                    point: EncodedPoint::from_point(&blinded)?,
                    count: public.encrypt_with_nonce(count, nonce)?,
                })
            })
            .collect::<Result<Vec<_>, PsiError>>()?;

        deadline.check()?;
        shuffle(&mut client_points, rng);
        shuffle(&mut leak_units, rng);

        debug!(
            client_points = client_points.len(),
            leak_units = leak_units.len(),
            "round 2: response ready"
        );

        let state = ServerAwaitingAggregate {
            keypair: Arc::clone(&self.keypair),
            round_timeout: self.round_timeout,
        };
        Ok((
            state,
            ServerResponse {
                client_points,
                leak_units,
            },
        ))
    }
}

/// Server between rounds 2 and 4.
#[derive(Debug)]
pub struct ServerAwaitingAggregate {
    keypair: Arc<KeyPair>,
    round_timeout: Option<Duration>,
}

impl ServerAwaitingAggregate {
    /// Round 4: the aggregate occurrence count. The sentinel returns 0
    /// without decrypting.
    pub fn finish(self, message: &AggregateMessage) -> Result<u128, PsiError> {
        let deadline = RoundDeadline::start(Round::Reveal, self.round_timeout);

        let total = match message {
            AggregateMessage::NoMatches => {
                debug!("round 4: zero-match sentinel");
                0
            }
            AggregateMessage::Encrypted(ciphertext) => self
                .keypair
                .decrypt(ciphertext)?
                .to_u128()
                .ok_or(PsiError::AggregateOutOfRange)?,
        };

        deadline.check()?;
        Ok(total)
    }
}
