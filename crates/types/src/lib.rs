//! Ledger Types
//!
//! Exact monetary amounts, account identifiers and rational rates shared by
//! the inflation engine and its tooling.
//!
//! Monetary unit: dust. One whole unit equals `dust_multiplier` dust, where the
//! multiplier is a power of ten chosen by configuration (10^6 by default).

pub mod account;
pub mod amount;
pub mod rate;

pub use account::*;
pub use amount::*;
pub use rate::*;
