//! Immutable account snapshot taken at round start

use crate::errors::RoundError;
use ledger_types::{Account, AccountId, LedgerAmount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Validated set of accounts a round votes and pays over.
///
/// Guarantees: non-empty, unique ids, no negative balances. Ordering is the
/// order supplied by the caller and does not affect any result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AccountSnapshot {
    accounts: Vec<Account>,
    #[serde(skip)]
    index: HashMap<AccountId, usize>,
}

impl AccountSnapshot {
    pub fn new(accounts: Vec<Account>) -> Result<Self, RoundError> {
        if accounts.is_empty() {
            return Err(RoundError::EmptySnapshot);
        }

        let mut index = HashMap::with_capacity(accounts.len());
        for (position, account) in accounts.iter().enumerate() {
            if account.balance.is_negative() {
                return Err(RoundError::NegativeBalance(account.id.clone()));
            }
            if index.insert(account.id.clone(), position).is_some() {
                return Err(RoundError::DuplicateAccount(account.id.clone()));
            }
        }

        Ok(Self { accounts, index })
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn get(&self, id: &AccountId) -> Option<&Account> {
        self.index.get(id).map(|&position| &self.accounts[position])
    }

    pub fn contains(&self, id: &AccountId) -> bool {
        self.index.contains_key(id)
    }

    pub fn total_balance(&self) -> LedgerAmount {
        self.accounts.iter().map(|a| &a.balance).sum()
    }
}

impl<'de> Deserialize<'de> for AccountSnapshot {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            accounts: Vec<Account>,
        }

        let raw = Raw::deserialize(deserializer)?;
        AccountSnapshot::new(raw.accounts).map_err(serde::de::Error::custom)
    }
}
