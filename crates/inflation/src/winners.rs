//! Winner selection
//!
//! Candidates are ranked by votes, highest first, with ties broken by
//! ascending account id. Candidates strictly above the minimum-vote threshold
//! win, up to `num_winners`. When nobody clears the threshold the top
//! `num_winners` win regardless, so a round always has recipients.

use crate::params::InflationParams;
use crate::tally::VoteTally;
use ledger_types::{AccountId, LedgerAmount};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Which rule produced the winner set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionRule {
    AboveThreshold,
    Fallback,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub id: AccountId,
    pub votes: LedgerAmount,
}

/// Ordered winners of one round, highest votes first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerSet {
    pub winners: Vec<Winner>,
    pub rule: SelectionRule,
    pub min_votes: LedgerAmount,
}

impl WinnerSet {
    pub fn len(&self) -> usize {
        self.winners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }

    /// Sum of winners' votes; the denominator of every share.
    pub fn win_basis(&self) -> LedgerAmount {
        self.winners.iter().map(|w| &w.votes).sum()
    }

    pub fn contains(&self, id: &AccountId) -> bool {
        self.winners.iter().any(|w| &w.id == id)
    }
}

/// Votes descending, then account id ascending.
pub fn rank_candidates(tally: &VoteTally) -> Vec<Winner> {
    let mut ranked: Vec<Winner> = tally
        .iter()
        .map(|(id, votes)| Winner {
            id: id.clone(),
            votes: votes.clone(),
        })
        .collect();
    ranked.sort_by(|a, b| match b.votes.cmp(&a.votes) {
        Ordering::Equal => a.id.cmp(&b.id),
        other => other,
    });
    ranked
}

pub fn select_winners(
    tally: &VoteTally,
    total_supply: &LedgerAmount,
    params: &InflationParams,
) -> WinnerSet {
    let min_votes = params.min_votes(total_supply);
    let ranked = rank_candidates(tally);

    let qualified = ranked
        .iter()
        .take(params.num_winners)
        .take_while(|candidate| candidate.votes > min_votes)
        .count();

    let (winners, rule) = if qualified > 0 {
        (ranked.into_iter().take(qualified).collect::<Vec<_>>(), SelectionRule::AboveThreshold)
    } else {
        warn!(
            target: "inflation",
            "No candidate above {} votes; falling back to top {} of {}",
            min_votes,
            params.num_winners,
            ranked.len()
        );
        (
            ranked.into_iter().take(params.num_winners).collect::<Vec<_>>(),
            SelectionRule::Fallback,
        )
    };

    debug!(
        target: "inflation",
        "Selected {} winners ({:?}), min_votes={}",
        winners.len(),
        rule,
        min_votes
    );

    WinnerSet {
        winners,
        rule,
        min_votes,
    }
}
