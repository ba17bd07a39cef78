//! Sequence guard
//!
//! Rounds apply in gapless increasing order: the only acceptable sequence
//! number is `last_applied + 1`. Replays, duplicates and gaps are rejected
//! without state change. The guard itself is plain data; the engine wraps it
//! in the same lock as the balances it protects.

use crate::errors::RoundError;
use crate::schedule::RoundSchedule;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceGuard {
    last_applied: u64,
    last_applied_at: Option<u64>,
}

impl SequenceGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from persisted state.
    pub fn resume(last_applied: u64, last_applied_at: Option<u64>) -> Self {
        Self {
            last_applied,
            last_applied_at,
        }
    }

    pub fn last_applied(&self) -> u64 {
        self.last_applied
    }

    pub fn last_applied_at(&self) -> Option<u64> {
        self.last_applied_at
    }

    /// The only sequence number that may apply next, `None` once
    /// `u64::MAX` has been applied.
    pub fn next_expected(&self) -> Option<u64> {
        self.last_applied.checked_add(1)
    }

    /// Decide whether `sequence` may apply at close time `now`.
    pub fn check(
        &self,
        sequence: u64,
        schedule: &RoundSchedule,
        now: u64,
    ) -> Result<(), RoundError> {
        let Some(expected) = self.next_expected() else {
            warn!(
                target: "inflation",
                "Rejecting inflation round {}: sequence space exhausted at {}",
                sequence,
                self.last_applied
            );
            return Err(RoundError::InvalidSequence {
                expected: self.last_applied,
                got: sequence,
            });
        };
        if sequence != expected {
            warn!(
                target: "inflation",
                "Rejecting inflation round {}: expected {}",
                sequence,
                expected
            );
            return Err(RoundError::InvalidSequence {
                expected,
                got: sequence,
            });
        }

        schedule
            .check(sequence, self.last_applied_at, now)
            .map_err(|err| {
                warn!(target: "inflation", "Rejecting inflation round {}: {}", sequence, err);
                err
            })
    }

    /// Record `sequence` as applied. Call only after a successful [`check`].
    ///
    /// [`check`]: SequenceGuard::check
    pub fn advance(&mut self, sequence: u64, now: u64) {
        debug_assert_eq!(Some(sequence), self.next_expected());
        self.last_applied = sequence;
        self.last_applied_at = Some(now);
    }
}
