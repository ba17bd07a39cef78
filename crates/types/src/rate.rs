use crate::amount::{AmountError, LedgerAmount};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exact rational rate (`numerator / denominator`).
///
/// Applied as `amount * numerator / denominator` with truncating division so
/// results agree bit-for-bit with any other integer implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflationRate {
    pub numerator: u64,
    pub denominator: u64,
}

impl InflationRate {
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, AmountError> {
        if denominator == 0 {
            return Err(AmountError::ZeroDenominator);
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// `floor(amount * rate)` for non-negative amounts.
    pub fn apply(&self, amount: &LedgerAmount) -> Option<LedgerAmount> {
        amount.mul_ratio(self.numerator, self.denominator)
    }
}

impl fmt::Display for InflationRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_is_exact() {
        let rate = InflationRate::new(190_721, 1_000_000_000).unwrap();
        let total = LedgerAmount::from(100_000_000_000_000_000u64);
        assert_eq!(rate.apply(&total), Some(LedgerAmount::from(19_072_100_000_000u64)));

        // Truncates instead of rounding.
        assert_eq!(rate.apply(&LedgerAmount::from(10_000u64)), Some(LedgerAmount::from(1u64)));
    }

    #[test]
    fn test_zero_denominator_rejected() {
        assert_eq!(InflationRate::new(1, 0), Err(AmountError::ZeroDenominator));
        let unchecked = InflationRate { numerator: 1, denominator: 0 };
        assert_eq!(unchecked.apply(&LedgerAmount::from(5u64)), None);
    }
}
