//! Ledger Inflation: stake-voted emission rounds
//!
//! Every account votes its balance for an inflation destination. Candidates
//! above a minimum share of total supply (or, failing that, the top few)
//! split a prize pool of newly minted coins plus recycled fees in proportion
//! to their votes. All arithmetic is exact integer arithmetic on dust.
//!
//! [`compute_round`] is the pure calculation. [`InflationEngine`] wraps it
//! with the sequence guard, round schedule and an [`AccountLedger`], and
//! commits each accepted round atomically.
//!
//! Feature `parallel` adds [`tally_votes_parallel`] on the rayon pool. Its
//! tests only build with the feature enabled, so run the suite with
//! `cargo test --all-features` to cover it.

pub mod distribution;
pub mod engine;
pub mod errors;
pub mod guard;
pub mod ledger;
pub mod params;
pub mod prize;
pub mod round;
pub mod schedule;
pub mod snapshot;
pub mod supply;
pub mod tally;
pub mod winners;

pub use distribution::*;
pub use engine::*;
pub use errors::*;
pub use guard::*;
pub use ledger::*;
pub use params::*;
pub use prize::*;
pub use round::*;
pub use schedule::*;
pub use snapshot::*;
pub use supply::*;
pub use tally::*;
pub use winners::*;

pub use ledger_types::{Account, AccountId, AmountError, InflationRate, LedgerAmount};
