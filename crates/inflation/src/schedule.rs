//! Round timing
//!
//! The sequence guard decides *which* round may apply next; the schedule
//! decides *when*. Time is the ledger close time in seconds, read through a
//! [`LedgerClock`] so tests and replays can pin it.

use crate::errors::RoundError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Minimum-interval policy checked before a round is accepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundSchedule {
    /// Every correctly sequenced round is due immediately.
    #[default]
    Unrestricted,
    /// At least `seconds` must pass between accepted rounds.
    MinimumGap { seconds: u64 },
    /// Round `n` becomes due at `start_time + (n - 1) * frequency_secs`.
    Anchored { start_time: u64, frequency_secs: u64 },
}

impl RoundSchedule {
    /// Earliest close time at which `sequence` may apply, if constrained.
    pub fn due_at(&self, sequence: u64, last_applied_at: Option<u64>) -> Option<u64> {
        match *self {
            RoundSchedule::Unrestricted => None,
            RoundSchedule::MinimumGap { seconds } => {
                last_applied_at.map(|last| last.saturating_add(seconds))
            }
            RoundSchedule::Anchored {
                start_time,
                frequency_secs,
            } => Some(
                start_time
                    .saturating_add(sequence.saturating_sub(1).saturating_mul(frequency_secs)),
            ),
        }
    }

    pub fn check(
        &self,
        sequence: u64,
        last_applied_at: Option<u64>,
        now: u64,
    ) -> Result<(), RoundError> {
        match self.due_at(sequence, last_applied_at) {
            Some(due_at) if now < due_at => Err(RoundError::TooSoon { now, due_at }),
            _ => Ok(()),
        }
    }
}

/// Source of ledger close time.
pub trait LedgerClock: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall clock, seconds since the Unix epoch.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl LedgerClock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Clock advanced explicitly by the caller.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self(AtomicU64::new(start))
    }

    pub fn set(&self, now: u64) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: u64) {
        self.0.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl LedgerClock for ManualClock {
    fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}
