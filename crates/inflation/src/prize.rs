use crate::errors::RoundError;
use crate::params::InflationParams;
use ledger_types::{InflationRate, LedgerAmount};

/// Units available for distribution this round.
///
/// `floor((total_supply - fee_pool) * rate) + fee_pool`. Fees collected since
/// the previous round are folded back in whole rather than inflated.
pub fn prize_pool(
    total_supply: &LedgerAmount,
    fee_pool: &LedgerAmount,
    rate: &InflationRate,
) -> Result<LedgerAmount, RoundError> {
    if fee_pool.is_negative() || fee_pool > total_supply {
        return Err(RoundError::InvalidFeePool {
            fee_pool: fee_pool.clone(),
            total_supply: total_supply.clone(),
        });
    }

    let inflatable = total_supply - fee_pool;
    let minted = rate.apply(&inflatable).ok_or_else(|| {
        RoundError::InvalidParameter("inflation_rate denominator must be greater than 0".into())
    })?;
    Ok(minted + fee_pool.clone())
}

/// Parse a fee pool given in whole units (e.g. `"0.000288"`) into dust using
/// the configured dust multiplier.
pub fn parse_fee_pool(input: &str, params: &InflationParams) -> Result<LedgerAmount, RoundError> {
    let fee_pool = LedgerAmount::parse_units(input, params.dust_multiplier)?;
    if fee_pool.is_negative() {
        return Err(RoundError::MalformedAmount(format!(
            "fee pool {input:?} is negative"
        )));
    }
    Ok(fee_pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate() -> InflationRate {
        InflationRate::new(190_721, 1_000_000_000).unwrap()
    }

    #[test]
    fn test_prize_without_fees() {
        let total = LedgerAmount::from(100_000_000_000_000_000u64);
        let pool = prize_pool(&total, &LedgerAmount::zero(), &rate()).unwrap();
        assert_eq!(pool, LedgerAmount::from(19_072_100_000_000u64));
    }

    #[test]
    fn test_fees_fold_back_whole() {
        let total = LedgerAmount::from(100_000_000_000_000_000u64);
        let pool = prize_pool(&total, &LedgerAmount::from(288u64), &rate()).unwrap();
        // floor((10^17 - 288) * 190721 / 10^9) = 19_072_099_999_999
        assert_eq!(pool, LedgerAmount::from(19_072_100_000_287u64));
    }

    #[test]
    fn test_invalid_fee_pool() {
        let total = LedgerAmount::from(100u64);
        assert!(matches!(
            prize_pool(&total, &LedgerAmount::from(101u64), &rate()),
            Err(RoundError::InvalidFeePool { .. })
        ));
        assert!(prize_pool(&total, &LedgerAmount::from(-1i64), &rate()).is_err());
        assert_eq!(
            prize_pool(&total, &total, &rate()).unwrap(),
            LedgerAmount::from(100u64)
        );
    }

    #[test]
    fn test_parse_fee_pool() {
        let params = InflationParams::default();
        assert_eq!(
            parse_fee_pool("0.000288", &params),
            Ok(LedgerAmount::from(288u64))
        );
        assert_eq!(parse_fee_pool("3", &params), Ok(LedgerAmount::from(3_000_000u64)));

        for bad in ["", "12x", "0.0000001", "-1"] {
            assert!(
                matches!(parse_fee_pool(bad, &params), Err(RoundError::MalformedAmount(_))),
                "{bad:?} should be malformed"
            );
        }
    }
}
