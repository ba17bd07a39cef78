//! Snapshot files
//!
//! ```json
//! {
//!   "total_supply": "100000000000000000",
//!   "accounts": [
//!     { "id": "alice", "balance": "5000000", "inflation_destination": "bob" },
//!     { "id": "bob", "balance": "250" }
//!   ]
//! }
//! ```
//!
//! Amounts are raw dust strings. `total_supply` may be omitted, in which case
//! it is the sum of balances plus the fee pool about to be recycled.

use anyhow::{bail, Context, Result};
use ledger_inflation::{AccountSnapshot, InMemoryAccountLedger};
use ledger_types::{Account, LedgerAmount};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub total_supply: Option<LedgerAmount>,
    pub accounts: Vec<Account>,
}

impl SnapshotFile {
    pub fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))
    }

    pub fn snapshot(&self) -> Result<AccountSnapshot> {
        AccountSnapshot::new(self.accounts.clone()).context("Invalid snapshot")
    }

    /// Ledger holding the snapshot's accounts, with everything not held by an
    /// account (normally the fee pool) kept as reserve.
    pub fn into_ledger(self, fee_pool: &LedgerAmount) -> Result<InMemoryAccountLedger> {
        let snapshot = self.snapshot()?;
        let held = snapshot.total_balance();
        let total_supply = self
            .total_supply
            .unwrap_or_else(|| &held + fee_pool);
        if total_supply < held {
            bail!("total_supply {total_supply} is below the sum of balances {held}");
        }
        let reserve = &total_supply - &held;
        Ok(InMemoryAccountLedger::with_accounts(self.accounts, reserve))
    }
}
