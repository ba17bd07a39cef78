use crate::errors::RoundError;
use crate::schedule::RoundSchedule;
use ledger_types::{dust_decimals, InflationRate, LedgerAmount, DEFAULT_DUST_MULTIPLIER};
use serde::{Deserialize, Serialize};

/// Parameters controlling winner selection, minting and timing.
///
/// Everything that older oracles hard-coded lives here so one routine serves
/// every network profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InflationParams {
    /// Maximum number of accounts awarded per round.
    pub num_winners: usize,
    /// Votes a candidate needs, in thousandths of total supply, to qualify
    /// without the fallback.
    pub min_vote_permil: u64,
    /// Fraction of (total supply - fee pool) minted per round.
    pub inflation_rate: InflationRate,
    /// Dust per whole unit. Must be a power of ten.
    pub dust_multiplier: u64,
    pub schedule: RoundSchedule,
}

impl Default for InflationParams {
    fn default() -> Self {
        Self {
            num_winners: 50,
            min_vote_permil: 15,
            // 0.000190721 per round
            inflation_rate: InflationRate {
                numerator: 190_721,
                denominator: 1_000_000_000,
            },
            dust_multiplier: DEFAULT_DUST_MULTIPLIER,
            schedule: RoundSchedule::Unrestricted,
        }
    }
}

impl InflationParams {
    pub fn validate(&self) -> Result<(), RoundError> {
        if self.num_winners == 0 {
            return Err(RoundError::InvalidParameter(
                "num_winners must be greater than 0".into(),
            ));
        }
        if self.min_vote_permil > 1_000 {
            return Err(RoundError::InvalidParameter(format!(
                "min_vote_permil must be at most 1000, got {}",
                self.min_vote_permil
            )));
        }
        if self.inflation_rate.denominator == 0 {
            return Err(RoundError::InvalidParameter(
                "inflation_rate denominator must be greater than 0".into(),
            ));
        }
        dust_decimals(self.dust_multiplier)
            .map_err(|err| RoundError::InvalidParameter(err.to_string()))?;
        Ok(())
    }

    /// Strict lower bound a candidate's votes must exceed to qualify.
    pub fn min_votes(&self, total_supply: &LedgerAmount) -> LedgerAmount {
        total_supply
            .mul_ratio(self.min_vote_permil, 1_000)
            .unwrap_or_default()
    }
}
