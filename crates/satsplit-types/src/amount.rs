//! Fixed-point amounts in satoshis
//!
//! SatSplit keeps every monetary value as a signed integer count of the
//! smallest Bitcoin unit. One satoshi is the settlement tolerance, so a balance
//! is settled exactly when it is zero.
//!
//! The operator impls saturate at the `i64` bounds instead of panicking or
//! wrapping. Use `checked_add`/`checked_sub` where overflow must be reported.

use crate::{Result, SatsplitError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Number of satoshis in one whole bitcoin
pub const SATS_PER_BTC: i64 = 100_000_000;

/// Number of decimal places of the whole-unit denomination
pub const BTC_DECIMALS: u32 = 8;

/// A signed amount of satoshis
///
/// Positive balances mean the holder is owed money, negative balances mean the
/// holder owes money. Serializes as a bare integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    /// The zero amount
    pub const ZERO: Self = Self(0);

    /// Create an amount from satoshis
    pub const fn from_sats(sats: i64) -> Self {
        Self(sats)
    }

    /// Create an amount from whole bitcoins
    pub fn from_btc(btc: i64) -> Result<Self> {
        btc.checked_mul(SATS_PER_BTC)
            .map(Self)
            .ok_or(SatsplitError::AmountOverflow)
    }

    /// Create a zero amount
    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Raw value in satoshis
    pub const fn sats(self) -> i64 {
        self.0
    }

    /// Check if the amount is zero
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Clamp a wide intermediate total into range
    pub fn saturating_from_i128(sats: i128) -> Self {
        match i64::try_from(sats) {
            Ok(v) => Self(v),
            Err(_) if sats > 0 => Self(i64::MAX),
            Err(_) => Self(i64::MIN),
        }
    }

    /// Get the absolute value (`i64::MIN` saturates to `i64::MAX`)
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Exact magnitude in satoshis
    pub const fn unsigned_abs(self) -> u64 {
        self.0.unsigned_abs()
    }

    /// Checked addition
    pub fn checked_add(self, other: Self) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(SatsplitError::AmountOverflow)
    }

    /// Checked subtraction
    pub fn checked_sub(self, other: Self) -> Result<Self> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(SatsplitError::AmountUnderflow)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sats", self.0)
    }
}

impl From<i64> for Amount {
    fn from(sats: i64) -> Self {
        Self(sats)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0.saturating_neg())
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self::saturating_from_i128(iter.map(|a| i128::from(a.0)).sum())
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_arithmetic() {
        let a = Amount::from_sats(300);
        let b = Amount::from_sats(100);

        assert_eq!(a + b, Amount::from_sats(400));
        assert_eq!(a - b, Amount::from_sats(200));
        assert_eq!(-a, Amount::from_sats(-300));
        assert_eq!((b - a).abs(), Amount::from_sats(200));
    }

    #[test]
    fn test_checked_overflow() {
        let max = Amount::from_sats(i64::MAX);
        assert_eq!(max.checked_add(Amount::from_sats(1)), Err(SatsplitError::AmountOverflow));

        let min = Amount::from_sats(i64::MIN);
        assert_eq!(min.checked_sub(Amount::from_sats(1)), Err(SatsplitError::AmountUnderflow));
    }

    #[test]
    fn test_operators_saturate_at_bounds() {
        let max = Amount::from_sats(i64::MAX);
        let min = Amount::from_sats(i64::MIN);

        assert_eq!(max + Amount::from_sats(1), max);
        assert_eq!(min - Amount::from_sats(1), min);
        assert_eq!(-min, max);
        assert_eq!(min.abs(), max);
        assert_eq!(min.unsigned_abs(), 1u64 << 63);

        let mut acc = max;
        acc += max;
        assert_eq!(acc, max);
    }

    #[test]
    fn test_sum_is_exact_until_the_end() {
        // Intermediate totals leave the i64 range but the final sum fits.
        let amounts = [Amount::from_sats(i64::MAX), Amount::from_sats(i64::MAX), Amount::from_sats(-i64::MAX)];
        let total: Amount = amounts.iter().sum();
        assert_eq!(total, Amount::from_sats(i64::MAX));

        assert_eq!(Amount::saturating_from_i128(i128::from(i64::MIN) - 5), Amount::from_sats(i64::MIN));
    }

    #[test]
    fn test_from_btc() {
        assert_eq!(Amount::from_btc(2).unwrap().sats(), 200_000_000);
        assert!(Amount::from_btc(i64::MAX).is_err());
    }

    #[test]
    fn test_sign_predicates() {
        assert!(Amount::from_sats(1).is_positive());
        assert!(Amount::from_sats(-1).is_negative());
        assert!(Amount::ZERO.is_zero());
    }

    #[test]
    fn test_sum_of_amounts() {
        let amounts = [Amount::from_sats(200), Amount::from_sats(-100), Amount::from_sats(-100)];
        let total: Amount = amounts.iter().sum();
        assert!(total.is_zero());
    }

    #[test]
    fn test_serializes_as_integer() {
        let json = serde_json::to_string(&Amount::from_sats(1_500)).unwrap();
        assert_eq!(json, "1500");
    }
}
