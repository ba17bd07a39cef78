//! Account ledger interface for inflation payouts
//!
//! The engine reads snapshots from, and commits awards into, an
//! [`AccountLedger`]. Commits are all-or-nothing: an implementation validates
//! every credit before mutating anything.

use crate::errors::RoundError;
use crate::round::RoundOutcome;
use crate::snapshot::AccountSnapshot;
use ledger_types::{Account, AccountId, LedgerAmount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Interface for account ledger operations.
pub trait AccountLedger: Send + Sync {
    /// Current balance, `None` for unknown accounts.
    fn balance(&self, id: &AccountId) -> Option<LedgerAmount>;

    /// Total coins in existence, including the fee pool.
    fn total_supply(&self) -> LedgerAmount;

    /// Every account with its balance and declared destination.
    fn snapshot(&self) -> Result<AccountSnapshot, RoundError>;

    /// Credit every award and set the new total supply, atomically.
    fn apply_round(&mut self, outcome: &RoundOutcome) -> Result<(), RoundError>;
}

// -----------------------------------------------------------------------------
// In-memory implementation (tooling and tests)
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryAccountLedger {
    accounts: BTreeMap<AccountId, Account>,
    total_supply: LedgerAmount,
}

impl InMemoryAccountLedger {
    pub fn new(total_supply: LedgerAmount) -> Self {
        Self {
            accounts: BTreeMap::new(),
            total_supply,
        }
    }

    /// Ledger holding `accounts`; total supply is their balance sum plus
    /// `reserve` (coins held outside any voting account, e.g. the fee pool).
    pub fn with_accounts(accounts: Vec<Account>, reserve: LedgerAmount) -> Self {
        let mut ledger = Self::new(reserve);
        for account in accounts {
            ledger.total_supply += &account.balance;
            ledger.accounts.insert(account.id.clone(), account);
        }
        ledger
    }

    /// Insert or replace an account without touching total supply.
    pub fn upsert_account(&mut self, account: Account) {
        self.accounts.insert(account.id.clone(), account);
    }

    pub fn set_destination(
        &mut self,
        id: &AccountId,
        destination: Option<AccountId>,
    ) -> Result<(), RoundError> {
        let account = self
            .accounts
            .get_mut(id)
            .ok_or_else(|| RoundError::Ledger(format!("unknown account {id}")))?;
        account.inflation_destination = destination;
        Ok(())
    }

    /// Move `fee` from `id`'s balance into the fee pool. Supply is unchanged;
    /// the caller tracks the pool and hands it to the next round.
    pub fn charge_fee(&mut self, id: &AccountId, fee: &LedgerAmount) -> Result<(), RoundError> {
        let account = self
            .accounts
            .get_mut(id)
            .ok_or_else(|| RoundError::Ledger(format!("unknown account {id}")))?;
        if &account.balance < fee {
            return Err(RoundError::Ledger(format!("insufficient balance in {id}")));
        }
        account.balance -= fee;
        Ok(())
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }
}

impl AccountLedger for InMemoryAccountLedger {
    fn balance(&self, id: &AccountId) -> Option<LedgerAmount> {
        self.accounts.get(id).map(|a| a.balance.clone())
    }

    fn total_supply(&self) -> LedgerAmount {
        self.total_supply.clone()
    }

    fn snapshot(&self) -> Result<AccountSnapshot, RoundError> {
        AccountSnapshot::new(self.accounts.values().cloned().collect())
    }

    fn apply_round(&mut self, outcome: &RoundOutcome) -> Result<(), RoundError> {
        if let Some(missing) = outcome.awards.keys().find(|id| !self.accounts.contains_key(*id)) {
            return Err(RoundError::Ledger(format!(
                "award for unknown account {missing}"
            )));
        }

        for (id, award) in &outcome.awards {
            if let Some(account) = self.accounts.get_mut(id) {
                account.balance += award;
                debug!(target: "inflation", "Credited {} to {}", award, id);
            }
        }
        self.total_supply = outcome.new_total_supply.clone();
        Ok(())
    }
}
