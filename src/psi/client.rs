//! Client role: holds the credential set and k1

use super::deadline::RoundDeadline;
use super::messages::{AggregateMessage, BlindedCredentials, EncodedPoint, ServerResponse};
use super::scalar::BlindingScalar;
use super::{shuffle, PsiError, Round};
use crate::credential::Credential;
use crate::curve::{CurveGroup, CurvePoint};
use crate::paillier::{Ciphertext, PublicKey};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Client with a private credential set.
///
/// Each call to [`Client::blind_credentials`] starts a new session with a
/// fresh k1.
pub struct Client {
    group: Arc<CurveGroup>,
    public_key: PublicKey,
    credentials: Vec<Credential>,
    round_timeout: Option<Duration>,
}

impl Client {
    pub fn new(group: Arc<CurveGroup>, public_key: PublicKey, credentials: Vec<Credential>) -> Self {
        Self {
            group,
            public_key,
            credentials,
            round_timeout: None,
        }
    }

    pub fn with_round_timeout(mut self, round_timeout: Option<Duration>) -> Self {
        self.round_timeout = round_timeout;
        self
    }

    pub fn credential_count(&self) -> usize {
        self.credentials.len()
    }

    /// Round 1: k1·H(c) for every credential, shuffled.
    pub fn blind_credentials<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(ClientAwaitingResponse, BlindedCredentials), PsiError> {
        let deadline = RoundDeadline::start(Round::BlindCredentials, self.round_timeout);
        let scalar = BlindingScalar::random(self.group.order(), rng);
        let group = self.group.as_ref();

        let mut points = self
            .credentials
            .par_iter()
            .map(|credential| -> Result<EncodedPoint, PsiError> {
                deadline.check()?;
                let point = group.hash_to_curve(credential.digest().as_bytes())?;
                Ok(EncodedPoint::from_point(&scalar.blind(group, &point)?)?)
            })
            .collect::<Result<Vec<_>, PsiError>>()?;

        deadline.check()?;
        shuffle(&mut points, rng);

        debug!(credentials = points.len(), "round 1: credentials blinded");

        let state = ClientAwaitingResponse {
            group: Arc::clone(&self.group),
            public_key: self.public_key.clone(),
            scalar,
            round_timeout: self.round_timeout,
        };
        Ok((state, BlindedCredentials { points }))
    }
}

/// Client between rounds 1 and 3: still holds k1.
#[derive(Debug)]
pub struct ClientAwaitingResponse {
    group: Arc<CurveGroup>,
    public_key: PublicKey,
    scalar: BlindingScalar,
    round_timeout: Option<Duration>,
}

impl ClientAwaitingResponse {
    /// Round 3: find matching units and sum their encrypted counts.
    ///
    /// The accumulator is seeded with the first matching ciphertext, then
    /// re-randomized with a fresh Enc(0) so the server cannot recognise one
    /// of its own ciphertexts. No match yields the sentinel without touching
    /// the cryptosystem. k1 is dropped when this returns.
    pub fn aggregate<R: RngCore + CryptoRng + ?Sized>(
        self,
        response: &ServerResponse,
        rng: &mut R,
    ) -> Result<AggregateMessage, PsiError> {
        let deadline = RoundDeadline::start(Round::Aggregate, self.round_timeout);
        let group = self.group.as_ref();

        let own: HashSet<CurvePoint> = response
            .client_points
            .par_iter()
            .map(|encoded| -> Result<CurvePoint, PsiError> {
                deadline.check()?;
                Ok(encoded.decode(group)?)
            })
            .collect::<Result<HashSet<_>, PsiError>>()?;

        let matched = response
            .leak_units
            .par_iter()
            .map(|unit| -> Result<Option<&Ciphertext>, PsiError> {
                deadline.check()?;
                let point = unit.point.decode(group)?;
                let doubly_blinded = self.scalar.blind(group, &point)?;
                Ok(own.contains(&doubly_blinded).then_some(&unit.count))
            })
            .collect::<Result<Vec<_>, PsiError>>()?;

        deadline.check()?;

        let mut matched = matched.into_iter().flatten();
        let Some(first) = matched.next() else {
            debug!(units = response.leak_units.len(), "round 3: no matching records");
            return Ok(AggregateMessage::NoMatches);
        };

        let mut total = first.clone();
        for count in matched {
            total = self.public_key.combine(&total, count)?;
        }

        let zero = self.public_key.encrypt(&BigUint::from(0u32), rng)?;
        let total = self.public_key.combine(&total, &zero)?;

        deadline.check()?;
        debug!(units = response.leak_units.len(), "round 3: aggregate ready");

        Ok(AggregateMessage::Encrypted(total))
    }
}
