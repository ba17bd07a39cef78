//! One inflation round as a pure function of snapshot and parameters

use crate::distribution::distribute;
use crate::errors::RoundError;
use crate::params::InflationParams;
use crate::prize::prize_pool;
use crate::snapshot::AccountSnapshot;
use crate::tally::tally_votes;
use crate::winners::{select_winners, Winner, WinnerSet};
use ledger_types::{AccountId, LedgerAmount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Inputs that identify a round besides the snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflationRound {
    pub sequence_number: u64,
    /// Fees collected since the previous accepted round.
    pub fee_pool: LedgerAmount,
    pub total_supply_before: LedgerAmount,
}

/// Result of a computed round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub sequence_number: u64,
    /// One entry per winner. Accounts absent from the map receive nothing.
    pub awards: BTreeMap<AccountId, LedgerAmount>,
    pub prize_pool: LedgerAmount,
    pub total_distributed: LedgerAmount,
    pub fee_pool_consumed: LedgerAmount,
    pub new_total_supply: LedgerAmount,
    pub winners: Vec<Winner>,
}

impl RoundOutcome {
    pub fn award_for(&self, id: &AccountId) -> LedgerAmount {
        self.awards.get(id).cloned().unwrap_or_default()
    }

    /// Part of the prize pool lost to floor division. Never minted.
    pub fn rounding_loss(&self) -> LedgerAmount {
        &self.prize_pool - &self.total_distributed
    }

    pub fn win_basis(&self) -> LedgerAmount {
        self.winners.iter().map(|w| &w.votes).sum()
    }

    /// Balances after applying the awards to `snapshot`.
    pub fn apply_to(&self, snapshot: &AccountSnapshot) -> BTreeMap<AccountId, LedgerAmount> {
        snapshot
            .accounts()
            .iter()
            .map(|account| {
                let award = self.award_for(&account.id);
                (account.id.clone(), &account.balance + &award)
            })
            .collect()
    }
}

/// Compute a round without consulting or changing any sequence state.
pub fn compute_round(
    snapshot: &AccountSnapshot,
    round: &InflationRound,
    params: &InflationParams,
) -> Result<RoundOutcome, RoundError> {
    params.validate()?;

    let total_supply = &round.total_supply_before;
    let snapshot_total = snapshot.total_balance();
    if &snapshot_total > total_supply {
        warn!(
            target: "inflation",
            "Snapshot balances {} exceed total supply {}",
            snapshot_total,
            total_supply
        );
    }

    let pool = prize_pool(total_supply, &round.fee_pool, &params.inflation_rate)?;
    let tally = tally_votes(snapshot);
    let winners: WinnerSet = select_winners(&tally, total_supply, params);
    let distribution = distribute(&winners, &pool);

    let new_total_supply =
        &(total_supply + &distribution.total_distributed) - &round.fee_pool;

    debug!(
        target: "inflation",
        "Round {}: prize_pool={}, distributed={}, supply {} -> {}",
        round.sequence_number,
        pool,
        distribution.total_distributed,
        total_supply,
        new_total_supply
    );

    Ok(RoundOutcome {
        sequence_number: round.sequence_number,
        awards: distribution.awards,
        prize_pool: pool,
        total_distributed: distribution.total_distributed,
        fee_pool_consumed: round.fee_pool.clone(),
        new_total_supply,
        winners: winners.winners,
    })
}
