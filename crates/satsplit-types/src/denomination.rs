//! Display denominations
//!
//! The presentation boundary. Amounts are rendered in, and parsed from, either
//! satoshis or whole bitcoins. Both directions use integer arithmetic only.

use crate::{Amount, Result, SatsplitError, BTC_DECIMALS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User-selectable display unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Denomination {
    /// Satoshis (smallest unit)
    #[serde(rename = "sats", alias = "sat")]
    Sats,
    /// Whole bitcoins
    #[default]
    #[serde(rename = "BTC", alias = "btc")]
    Btc,
}

impl Denomination {
    /// Decimal places shown for this unit
    pub fn decimals(&self) -> u32 {
        match self {
            Self::Sats => 0,
            Self::Btc => BTC_DECIMALS,
        }
    }

    /// Unit label used when formatting
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sats => "sats",
            Self::Btc => "BTC",
        }
    }

    /// Render the bare number (no unit, no grouping)
    pub fn render(&self, amount: Amount) -> String {
        let sats = amount.sats() as i128;
        let sign = if sats < 0 { "-" } else { "" };
        match self {
            Self::Sats => sats.to_string(),
            Self::Btc => {
                let scale = 10i128.pow(BTC_DECIMALS);
                let magnitude = sats.abs();
                format!(
                    "{sign}{}.{:0width$}",
                    magnitude / scale,
                    magnitude % scale,
                    width = BTC_DECIMALS as usize
                )
            }
        }
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Denomination {
    type Err = SatsplitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sats" | "sat" | "satoshi" | "satoshis" => Ok(Self::Sats),
            "btc" => Ok(Self::Btc),
            other => Err(SatsplitError::invalid_input(
                "denomination",
                format!("unknown unit '{other}', expected 'sats' or 'btc'"),
            )),
        }
    }
}

impl Amount {
    /// Format for display, e.g. `0.00000100 BTC` or `1,234 sats`
    pub fn format(&self, unit: Denomination) -> String {
        match unit {
            Denomination::Btc => format!("{} BTC", unit.render(*self)),
            Denomination::Sats => {
                let sats = self.sats() as i128;
                let sign = if sats < 0 { "-" } else { "" };
                format!("{sign}{} sats", group_thousands(&sats.abs().to_string()))
            }
        }
    }

    /// Parse user input expressed in `unit`
    ///
    /// Every character other than digits, `.` and `-` is discarded first, so
    /// `"1,234 sats"` and `"₿0.5"` are accepted. Precision beyond one satoshi
    /// is rounded half away from zero, so negative halves round down
    /// (`"-12.5"` sats is -13). This is deliberately not round-half-up,
    /// which would give -12.
    pub fn parse(input: &str, unit: Denomination) -> Result<Self> {
        let cleaned: String = input
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();

        let (negative, unsigned) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.as_str()),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let well_formed = !(whole.is_empty() && fraction.is_empty())
            && whole.bytes().all(|b| b.is_ascii_digit())
            && fraction.bytes().all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(SatsplitError::invalid_input(
                "amount",
                format!("'{input}' is not a number"),
            ));
        }

        let decimals = unit.decimals() as usize;
        let mut sats: i128 = 0;
        for digit in whole.bytes().chain(
            fraction
                .bytes()
                .chain(std::iter::repeat(b'0'))
                .take(decimals),
        ) {
            sats = sats
                .checked_mul(10)
                .and_then(|v| v.checked_add(i128::from(digit - b'0')))
                .ok_or(SatsplitError::AmountOverflow)?;
        }
        if fraction.as_bytes().get(decimals).is_some_and(|d| *d >= b'5') {
            sats += 1;
        }
        if negative {
            sats = -sats;
        }

        i64::try_from(sats)
            .map(Amount::from_sats)
            .map_err(|_| SatsplitError::AmountOverflow)
    }
}

/// Convert a user-entered value between units, returning the bare number
pub fn convert(input: &str, from: Denomination, to: Denomination) -> Result<String> {
    let amount = Amount::parse(input, from)?;
    Ok(to.render(amount))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_btc() {
        assert_eq!(Amount::from_sats(100).format(Denomination::Btc), "0.00000100 BTC");
        assert_eq!(Amount::from_sats(150_000_000).format(Denomination::Btc), "1.50000000 BTC");
        assert_eq!(Amount::from_sats(-1).format(Denomination::Btc), "-0.00000001 BTC");
    }

    #[test]
    fn test_format_sats_groups_thousands() {
        assert_eq!(Amount::from_sats(0).format(Denomination::Sats), "0 sats");
        assert_eq!(Amount::from_sats(999).format(Denomination::Sats), "999 sats");
        assert_eq!(Amount::from_sats(1_234).format(Denomination::Sats), "1,234 sats");
        assert_eq!(Amount::from_sats(-12_345_678).format(Denomination::Sats), "-12,345,678 sats");
    }

    #[test]
    fn test_extreme_amounts_format() {
        assert_eq!(
            Amount::from_sats(i64::MIN).format(Denomination::Btc),
            "-92233720368.54775808 BTC"
        );
    }

    #[test]
    fn test_parse_btc_exactly() {
        assert_eq!(Amount::parse("0.1", Denomination::Btc).unwrap().sats(), 10_000_000);
        assert_eq!(Amount::parse("0.00000001", Denomination::Btc).unwrap().sats(), 1);
        assert_eq!(Amount::parse("1.", Denomination::Btc).unwrap().sats(), 100_000_000);
        assert_eq!(Amount::parse(".5 BTC", Denomination::Btc).unwrap().sats(), 50_000_000);
    }

    #[test]
    fn test_parse_rounds_sub_satoshi_precision() {
        assert_eq!(Amount::parse("0.000000015", Denomination::Btc).unwrap().sats(), 2);
        assert_eq!(Amount::parse("0.000000014", Denomination::Btc).unwrap().sats(), 1);
        assert_eq!(Amount::parse("12.5", Denomination::Sats).unwrap().sats(), 13);
        assert_eq!(Amount::parse("-12.5", Denomination::Sats).unwrap().sats(), -13);
    }

    #[test]
    fn test_parse_strips_decoration() {
        assert_eq!(Amount::parse("1,234 sats", Denomination::Sats).unwrap().sats(), 1_234);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Amount::parse("", Denomination::Sats).is_err());
        assert!(Amount::parse("abc", Denomination::Btc).is_err());
        assert!(Amount::parse("1.2.3", Denomination::Btc).is_err());
        assert!(Amount::parse("--5", Denomination::Sats).is_err());
        assert!(Amount::parse("-", Denomination::Sats).is_err());
    }

    #[test]
    fn test_parse_overflow() {
        assert_eq!(
            Amount::parse("99999999999999999999", Denomination::Btc),
            Err(SatsplitError::AmountOverflow)
        );
    }

    #[test]
    fn test_convert_between_units() {
        assert_eq!(convert("1", Denomination::Btc, Denomination::Sats).unwrap(), "100000000");
        assert_eq!(convert("2500", Denomination::Sats, Denomination::Btc).unwrap(), "0.00002500");
        assert_eq!(convert("42", Denomination::Sats, Denomination::Sats).unwrap(), "42");
    }

    #[test]
    fn test_sats_survive_btc_rendering() {
        for sats in [0, 1, 99, 100_000_000, 123_456_789, -7] {
            let amount = Amount::from_sats(sats);
            let rendered = Denomination::Btc.render(amount);
            assert_eq!(Amount::parse(&rendered, Denomination::Btc).unwrap(), amount);
        }
    }

    #[test]
    fn test_denomination_from_str_and_serde() {
        assert_eq!("BTC".parse::<Denomination>().unwrap(), Denomination::Btc);
        assert_eq!("sats".parse::<Denomination>().unwrap(), Denomination::Sats);
        assert!("eth".parse::<Denomination>().is_err());

        let json = serde_json::to_string(&Denomination::Sats).unwrap();
        assert_eq!(json, "\"sats\"");
        let unit: Denomination = serde_json::from_str("\"BTC\"").unwrap();
        assert_eq!(unit, Denomination::Btc);
        assert_eq!(Denomination::default(), Denomination::Btc);
    }
}
