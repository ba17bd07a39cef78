//! Proportional distribution of the prize pool among winners

use crate::winners::WinnerSet;
use ledger_types::{AccountId, LedgerAmount};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Per-winner awards plus their exact sum.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Distribution {
    pub awards: BTreeMap<AccountId, LedgerAmount>,
    pub total_distributed: LedgerAmount,
}

/// Split `prize_pool` by `floor(votes * prize_pool / win_basis)`.
///
/// The floor remainder is not awarded to anyone and is not minted. When the
/// win basis is zero (every balance is zero) nothing is awarded.
pub fn distribute(winners: &WinnerSet, prize_pool: &LedgerAmount) -> Distribution {
    let win_basis = winners.win_basis();
    if !win_basis.is_positive() {
        if !winners.is_empty() {
            warn!(target: "inflation", "Win basis is zero; no awards this round");
        }
        return Distribution::default();
    }

    let mut distribution = Distribution::default();
    for winner in &winners.winners {
        let product = &winner.votes * prize_pool;
        let award = product.checked_div(&win_basis).unwrap_or_default();
        distribution.total_distributed += &award;
        distribution.awards.insert(winner.id.clone(), award);
    }

    debug!(
        target: "inflation",
        "Distributed {} of {} across {} winners (basis {})",
        distribution.total_distributed,
        prize_pool,
        distribution.awards.len(),
        win_basis
    );
    distribution
}
