//! Vote tally
//!
//! Every account casts its whole balance as one vote for its inflation
//! destination. Destinations are resolved through [`resolve_destination`]:
//! an unset target or one naming an account outside the snapshot counts as a
//! self-vote, because the ledger does not validate the target when it is
//! declared.

use crate::snapshot::AccountSnapshot;
use ledger_types::{Account, AccountId, LedgerAmount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// How an account's vote target was determined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestinationResolution {
    /// The declared destination exists in the snapshot.
    Declared,
    /// No destination declared; the account votes for itself.
    Unset,
    /// Declared destination is unknown; the account votes for itself.
    UnknownTarget,
}

/// Resolve the account that receives `account`'s vote.
pub fn resolve_destination<'a>(
    account: &'a Account,
    snapshot: &AccountSnapshot,
) -> (&'a AccountId, DestinationResolution) {
    match &account.inflation_destination {
        None => (&account.id, DestinationResolution::Unset),
        Some(dest) if snapshot.contains(dest) => (dest, DestinationResolution::Declared),
        Some(dest) => {
            debug!(
                target: "inflation",
                "Account {} votes for unknown account {}; counting as self-vote",
                account.id,
                dest
            );
            (&account.id, DestinationResolution::UnknownTarget)
        }
    }
}

/// Summed votes per candidate. Candidates with zero votes are absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    votes: BTreeMap<AccountId, LedgerAmount>,
}

impl VoteTally {
    pub fn get(&self, id: &AccountId) -> Option<&LedgerAmount> {
        self.votes.get(id)
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &LedgerAmount)> {
        self.votes.iter()
    }

    pub fn total(&self) -> LedgerAmount {
        self.votes.values().sum()
    }

    fn add_vote(&mut self, candidate: &AccountId, weight: &LedgerAmount) {
        if weight.is_zero() {
            return;
        }
        match self.votes.get_mut(candidate) {
            Some(total) => *total += weight,
            None => {
                self.votes.insert(candidate.clone(), weight.clone());
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn merge(mut self, other: VoteTally) -> VoteTally {
        for (candidate, weight) in other.votes {
            self.add_vote(&candidate, &weight);
        }
        self
    }
}

/// Tally every account's balance toward its resolved destination.
pub fn tally_votes(snapshot: &AccountSnapshot) -> VoteTally {
    let mut tally = VoteTally::default();
    for account in snapshot.accounts() {
        let (candidate, _) = resolve_destination(account, snapshot);
        tally.add_vote(candidate, &account.balance);
    }

    debug!(
        target: "inflation",
        "Tallied {} accounts into {} candidates",
        snapshot.len(),
        tally.len()
    );
    tally
}

/// Same result as [`tally_votes`], accumulated on the rayon pool.
#[cfg(feature = "parallel")]
pub fn tally_votes_parallel(snapshot: &AccountSnapshot) -> VoteTally {
    use rayon::prelude::*;

    snapshot
        .accounts()
        .par_iter()
        .fold(VoteTally::default, |mut tally, account| {
            let (candidate, _) = resolve_destination(account, snapshot);
            tally.add_vote(candidate, &account.balance);
            tally
        })
        .reduce(VoteTally::default, VoteTally::merge)
}
