//! Inflation engine
//!
//! Owns the sequence guard, the account ledger and the supply tracker behind
//! a single lock. Accepting a round, computing it, crediting balances and
//! advancing the sequence all happen inside one critical section, so two
//! callers racing with the same next sequence number get exactly one
//! acceptance.

use crate::errors::RoundError;
use crate::guard::SequenceGuard;
use crate::ledger::AccountLedger;
use crate::params::InflationParams;
use crate::round::{compute_round, InflationRound, RoundOutcome};
use crate::schedule::{LedgerClock, SystemClock};
use crate::snapshot::AccountSnapshot;
use crate::supply::{SupplyAuditResult, SupplyTracker};
use ledger_types::{AccountId, LedgerAmount};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

struct EngineState {
    guard: SequenceGuard,
    ledger: Box<dyn AccountLedger>,
    supply: SupplyTracker,
}

pub struct InflationEngine {
    params: InflationParams,
    clock: Arc<dyn LedgerClock>,
    state: Mutex<EngineState>,
}

impl InflationEngine {
    /// Engine starting before round 1, reading time from the system clock.
    pub fn new(params: InflationParams, ledger: Box<dyn AccountLedger>) -> Result<Self, RoundError> {
        Self::with_clock(params, ledger, Arc::new(SystemClock))
    }

    pub fn with_clock(
        params: InflationParams,
        ledger: Box<dyn AccountLedger>,
        clock: Arc<dyn LedgerClock>,
    ) -> Result<Self, RoundError> {
        Self::resume(params, ledger, clock, SequenceGuard::new())
    }

    /// Engine continuing from a persisted guard state.
    pub fn resume(
        params: InflationParams,
        ledger: Box<dyn AccountLedger>,
        clock: Arc<dyn LedgerClock>,
        guard: SequenceGuard,
    ) -> Result<Self, RoundError> {
        params.validate()?;
        let supply = SupplyTracker::new(ledger.total_supply());
        Ok(Self {
            params,
            clock,
            state: Mutex::new(EngineState {
                guard,
                ledger,
                supply,
            }),
        })
    }

    pub fn params(&self) -> &InflationParams {
        &self.params
    }

    /// Run one round over a caller-supplied snapshot.
    ///
    /// On success every award has been credited to the ledger and the total
    /// supply updated; on error nothing changed.
    pub fn run_inflation_round(
        &self,
        snapshot: AccountSnapshot,
        fee_pool: LedgerAmount,
        sequence_number: u64,
    ) -> Result<RoundOutcome, RoundError> {
        let mut state = self.state.lock();
        self.apply_locked(&mut state, &snapshot, fee_pool, sequence_number)
    }

    /// Run one round over a snapshot taken from the ledger under the lock.
    pub fn run_from_ledger(
        &self,
        fee_pool: LedgerAmount,
        sequence_number: u64,
    ) -> Result<RoundOutcome, RoundError> {
        let mut state = self.state.lock();
        let snapshot = state.ledger.snapshot()?;
        self.apply_locked(&mut state, &snapshot, fee_pool, sequence_number)
    }

    fn apply_locked(
        &self,
        state: &mut EngineState,
        snapshot: &AccountSnapshot,
        fee_pool: LedgerAmount,
        sequence_number: u64,
    ) -> Result<RoundOutcome, RoundError> {
        let now = self.clock.now();
        state
            .guard
            .check(sequence_number, &self.params.schedule, now)?;

        let round = InflationRound {
            sequence_number,
            fee_pool,
            total_supply_before: state.ledger.total_supply(),
        };
        let outcome = compute_round(snapshot, &round, &self.params)?;

        state.ledger.apply_round(&outcome)?;
        state.supply.record(&outcome);
        state.guard.advance(sequence_number, now);

        info!(
            target: "inflation",
            "Inflation round {} applied: {} winners, distributed {} of {}, supply {}",
            sequence_number,
            outcome.awards.len(),
            outcome.total_distributed,
            outcome.prize_pool,
            outcome.new_total_supply
        );
        Ok(outcome)
    }

    pub fn last_applied_sequence(&self) -> u64 {
        self.state.lock().guard.last_applied()
    }

    pub fn guard_state(&self) -> SequenceGuard {
        self.state.lock().guard
    }

    pub fn total_supply(&self) -> LedgerAmount {
        self.state.lock().ledger.total_supply()
    }

    pub fn balance(&self, id: &AccountId) -> Option<LedgerAmount> {
        self.state.lock().ledger.balance(id)
    }

    pub fn snapshot(&self) -> Result<AccountSnapshot, RoundError> {
        self.state.lock().ledger.snapshot()
    }

    pub fn supply_history(&self) -> SupplyTracker {
        self.state.lock().supply.clone()
    }

    pub fn audit_supply(&self) -> SupplyAuditResult {
        self.state.lock().supply.audit()
    }

    /// Read the ledger while holding the engine lock.
    ///
    /// Access is shared only: balances and supply change solely through
    /// accepted rounds, so the supply history always accounts for them.
    pub fn with_ledger<R>(&self, f: impl FnOnce(&dyn AccountLedger) -> R) -> R {
        let state = self.state.lock();
        f(&*state.ledger)
    }
}
