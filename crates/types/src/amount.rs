//! Fixed-point ledger amounts
//!
//! Every amount is an arbitrary-precision signed integer counted in dust.
//! Vote weights multiplied by prize pools easily exceed `u128`, so the
//! representation grows as needed instead of saturating the way fixed-width
//! atomic units do.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

/// Default number of dust per whole unit.
pub const DEFAULT_DUST_MULTIPLIER: u64 = 1_000_000;

/// Errors produced while building or parsing amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("malformed amount {input:?}: {reason}")]
    Malformed { input: String, reason: String },
    #[error("dust multiplier {0} is not a power of ten")]
    InvalidMultiplier(u64),
    #[error("rational rate has a zero denominator")]
    ZeroDenominator,
}

impl AmountError {
    fn malformed(input: &str, reason: impl Into<String>) -> Self {
        AmountError::Malformed {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Number of decimal places represented by a power-of-ten dust multiplier.
pub fn dust_decimals(multiplier: u64) -> Result<u32, AmountError> {
    if multiplier == 0 {
        return Err(AmountError::InvalidMultiplier(multiplier));
    }
    let mut rest = multiplier;
    let mut decimals = 0u32;
    while rest % 10 == 0 {
        rest /= 10;
        decimals += 1;
    }
    if rest != 1 {
        return Err(AmountError::InvalidMultiplier(multiplier));
    }
    Ok(decimals)
}

/// An exact amount of dust.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LedgerAmount(BigInt);

impl LedgerAmount {
    pub fn zero() -> Self {
        Self(BigInt::zero())
    }

    /// Wrap a raw dust count.
    pub fn from_dust(dust: impl Into<BigInt>) -> Self {
        Self(dust.into())
    }

    /// `units` whole units scaled by `multiplier`.
    pub fn from_units(units: u64, multiplier: u64) -> Self {
        Self(BigInt::from(units) * BigInt::from(multiplier))
    }

    /// Parse a whole-unit decimal string such as `"12.5"` into dust.
    ///
    /// Fractional digits beyond the precision of `multiplier` are rejected
    /// rather than rounded.
    pub fn parse_units(input: &str, multiplier: u64) -> Result<Self, AmountError> {
        let decimals = dust_decimals(multiplier)? as usize;
        let trimmed = input.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (whole, fraction) = match body.split_once('.') {
            Some((w, f)) => (w, f),
            None => (body, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(AmountError::malformed(input, "no digits"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(AmountError::malformed(input, "unexpected character"));
        }
        if fraction.len() > decimals {
            return Err(AmountError::malformed(
                input,
                format!("more than {decimals} fractional digits"),
            ));
        }

        let mut digits = String::with_capacity(whole.len() + decimals);
        digits.push_str(if whole.is_empty() { "0" } else { whole });
        digits.push_str(fraction);
        for _ in fraction.len()..decimals {
            digits.push('0');
        }

        let magnitude = BigInt::from_str(&digits)
            .map_err(|err| AmountError::malformed(input, err.to_string()))?;
        Ok(Self(if negative { -magnitude } else { magnitude }))
    }

    /// Render as whole units with exactly as many decimals as `multiplier` has.
    pub fn format_units(&self, multiplier: u64) -> Result<String, AmountError> {
        let decimals = dust_decimals(multiplier)?;
        let scale = BigInt::from(multiplier);
        let magnitude = self.0.abs();
        let whole = &magnitude / &scale;
        let fraction = &magnitude % &scale;
        let sign = if self.0.is_negative() { "-" } else { "" };
        if decimals == 0 {
            return Ok(format!("{sign}{whole}"));
        }
        Ok(format!(
            "{sign}{whole}.{:0>width$}",
            fraction.to_string(),
            width = decimals as usize
        ))
    }

    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    pub fn into_bigint(self) -> BigInt {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    /// Truncating division; `None` when `divisor` is zero.
    pub fn checked_div(&self, divisor: &LedgerAmount) -> Option<LedgerAmount> {
        if divisor.is_zero() {
            return None;
        }
        Some(Self(&self.0 / &divisor.0))
    }

    /// `self * numerator / denominator`, multiplying first so no precision is
    /// lost. `None` when `denominator` is zero.
    pub fn mul_ratio(&self, numerator: u64, denominator: u64) -> Option<LedgerAmount> {
        if denominator == 0 {
            return None;
        }
        Some(Self(
            &self.0 * BigInt::from(numerator) / BigInt::from(denominator),
        ))
    }

    pub fn to_u128(&self) -> Option<u128> {
        self.0.to_u128()
    }
}

impl fmt::Display for LedgerAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for LedgerAmount {
    type Err = AmountError;

    /// Parse a raw dust integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::malformed(s, "no digits"));
        }
        BigInt::from_str(trimmed)
            .map(Self)
            .map_err(|err| AmountError::malformed(s, err.to_string()))
    }
}

impl From<BigInt> for LedgerAmount {
    fn from(value: BigInt) -> Self {
        Self(value)
    }
}

impl From<u64> for LedgerAmount {
    fn from(value: u64) -> Self {
        Self(BigInt::from(value))
    }
}

impl From<i64> for LedgerAmount {
    fn from(value: i64) -> Self {
        Self(BigInt::from(value))
    }
}

impl From<u128> for LedgerAmount {
    fn from(value: u128) -> Self {
        Self(BigInt::from(value))
    }
}

impl Add for LedgerAmount {
    type Output = LedgerAmount;

    fn add(self, rhs: LedgerAmount) -> LedgerAmount {
        Self(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a LedgerAmount> for &'a LedgerAmount {
    type Output = LedgerAmount;

    fn add(self, rhs: &'a LedgerAmount) -> LedgerAmount {
        LedgerAmount(&self.0 + &rhs.0)
    }
}

impl Sub for LedgerAmount {
    type Output = LedgerAmount;

    fn sub(self, rhs: LedgerAmount) -> LedgerAmount {
        Self(self.0 - rhs.0)
    }
}

impl<'a> Sub<&'a LedgerAmount> for &'a LedgerAmount {
    type Output = LedgerAmount;

    fn sub(self, rhs: &'a LedgerAmount) -> LedgerAmount {
        LedgerAmount(&self.0 - &rhs.0)
    }
}

impl Mul for LedgerAmount {
    type Output = LedgerAmount;

    fn mul(self, rhs: LedgerAmount) -> LedgerAmount {
        Self(self.0 * rhs.0)
    }
}

impl<'a> Mul<&'a LedgerAmount> for &'a LedgerAmount {
    type Output = LedgerAmount;

    fn mul(self, rhs: &'a LedgerAmount) -> LedgerAmount {
        LedgerAmount(&self.0 * &rhs.0)
    }
}

impl AddAssign<&LedgerAmount> for LedgerAmount {
    fn add_assign(&mut self, rhs: &LedgerAmount) {
        self.0 += &rhs.0;
    }
}

impl AddAssign for LedgerAmount {
    fn add_assign(&mut self, rhs: LedgerAmount) {
        self.0 += rhs.0;
    }
}

impl SubAssign<&LedgerAmount> for LedgerAmount {
    fn sub_assign(&mut self, rhs: &LedgerAmount) {
        self.0 -= &rhs.0;
    }
}

impl Sum for LedgerAmount {
    fn sum<I: Iterator<Item = LedgerAmount>>(iter: I) -> Self {
        iter.fold(LedgerAmount::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a LedgerAmount> for LedgerAmount {
    fn sum<I: Iterator<Item = &'a LedgerAmount>>(iter: I) -> Self {
        iter.fold(LedgerAmount::zero(), |mut acc, x| {
            acc += x;
            acc
        })
    }
}

// JSON numbers cannot carry arbitrary precision, so amounts travel as
// decimal strings. Plain integers are still accepted on input.
impl Serialize for LedgerAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct LedgerAmountVisitor;

impl<'de> Visitor<'de> for LedgerAmountVisitor {
    type Value = LedgerAmount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a dust amount as a decimal string or integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<LedgerAmount, E> {
        LedgerAmount::from_str(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<LedgerAmount, E> {
        Ok(LedgerAmount::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<LedgerAmount, E> {
        Ok(LedgerAmount::from(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<LedgerAmount, E> {
        Ok(LedgerAmount::from(v))
    }
}

impl<'de> Deserialize<'de> for LedgerAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LedgerAmountVisitor)
    }
}
