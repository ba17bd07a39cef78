//! Account identity and snapshot records

use crate::amount::LedgerAmount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque account identifier.
///
/// Ordering is plain byte-wise string ordering; it is the deterministic
/// tie-break used wherever accounts with equal weight must be ranked.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One ledger party as seen at round start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub balance: LedgerAmount,
    /// Declared vote target; `None` means the account votes for itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_destination: Option<AccountId>,
}

impl Account {
    pub fn new(id: impl Into<AccountId>, balance: impl Into<LedgerAmount>) -> Self {
        Self {
            id: id.into(),
            balance: balance.into(),
            inflation_destination: None,
        }
    }

    pub fn with_destination(mut self, destination: impl Into<AccountId>) -> Self {
        self.inflation_destination = Some(destination.into());
        self
    }
}
