//! Per-round deadlines

use super::{PsiError, Round};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::warn;

/// Started at the beginning of a round; checked before every per-item step
/// and again before the round releases its message. With no limit, `check`
/// always passes. Shared by reference across rayon workers.
#[derive(Debug)]
pub(crate) struct RoundDeadline {
    round: Round,
    started: Instant,
    limit: Option<Duration>,
    reported: AtomicBool,
}

impl RoundDeadline {
    pub(crate) fn start(round: Round, limit: Option<Duration>) -> Self {
        Self {
            round,
            started: Instant::now(),
            limit,
            reported: AtomicBool::new(false),
        }
    }

    pub(crate) fn check(&self) -> Result<(), PsiError> {
        let Some(limit) = self.limit else {
            return Ok(());
        };

        let elapsed = self.started.elapsed();
        if elapsed >= limit {
            // Workers racing past the deadline log it once
            if !self.reported.swap(true, Ordering::Relaxed) {
                warn!(round = %self.round, ?elapsed, ?limit, "round deadline exceeded");
            }
            return Err(PsiError::RoundTimeout {
                round: self.round,
                limit,
            });
        }

        Ok(())
    }
}
