use ledger_types::{AccountId, AmountError, LedgerAmount};
use thiserror::Error;

/// Reasons an inflation round is rejected.
///
/// A rejected round never touches balances, supply or the last applied
/// sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("invalid inflation sequence: expected {expected}, got {got}")]
    InvalidSequence { expected: u64, got: u64 },

    #[error("inflation round not due yet: now={now}, due_at={due_at}")]
    TooSoon { now: u64, due_at: u64 },

    #[error("account snapshot is empty")]
    EmptySnapshot,

    #[error("malformed amount: {0}")]
    MalformedAmount(String),

    #[error("account {0} appears more than once in the snapshot")]
    DuplicateAccount(AccountId),

    #[error("account {0} has a negative balance")]
    NegativeBalance(AccountId),

    #[error("fee pool {fee_pool} outside [0, total supply {total_supply}]")]
    InvalidFeePool {
        fee_pool: LedgerAmount,
        total_supply: LedgerAmount,
    },

    #[error("invalid inflation parameter: {0}")]
    InvalidParameter(String),

    #[error("account ledger rejected the round: {0}")]
    Ledger(String),
}

impl From<AmountError> for RoundError {
    fn from(err: AmountError) -> Self {
        RoundError::MalformedAmount(err.to_string())
    }
}
