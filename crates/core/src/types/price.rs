//! Monetary amounts.
//!
//! The commerce API is inconsistent about how it encodes money: catalog
//! endpoints send plain JSON numbers, while checkout totals are decimal
//! strings. [`Amount`] accepts both on the wire and always re-serializes as a
//! string so no precision is lost on the way back out.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error parsing an [`Amount`] from a string.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid amount: {0}")]
pub struct AmountParseError(String);

/// A monetary amount in rupees.
///
/// Wraps a [`Decimal`]; display formatting uses Indian digit grouping
/// (`12,34,567.89`) to match how the brand presents prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount from a decimal value.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// The underlying decimal value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Checked addition.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Multiply by a unit count (for line totals).
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Format with a rupee sign and Indian digit grouping, e.g. `₹1,04,999.00`.
    #[must_use]
    pub fn display_inr(&self) -> String {
        let negative = self.0.is_sign_negative();
        let rounded = self.0.abs().round_dp(2);
        let raw = format!("{rounded:.2}");
        let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));

        let grouped = group_indian(int_part);
        if negative {
            format!("-₹{grouped}.{frac_part}")
        } else {
            format!("₹{grouped}.{frac_part}")
        }
    }
}

/// Indian grouping: last three digits, then groups of two.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<String> = Vec::new();
    let head_chars: Vec<char> = head.chars().collect();
    let mut idx = head_chars.len();
    while idx > 0 {
        let start = idx.saturating_sub(2);
        groups.push(head_chars.get(start..idx).map_or_else(String::new, |c| c.iter().collect()));
        idx = start;
    }
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|_| AmountParseError(s.to_owned()))
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal string or a number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(de::Error::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Decimal::try_from(v).map(Amount).map_err(de::Error::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Amount(Decimal::from(v)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let amount: Amount = "1499.50".parse().unwrap();
        assert_eq!(amount.to_string(), "1499.50");
    }

    #[test]
    fn test_display_inr_grouping() {
        let cases = [
            ("0", "₹0.00"),
            ("999", "₹999.00"),
            ("1000", "₹1,000.00"),
            ("104999", "₹1,04,999.00"),
            ("1234567.5", "₹12,34,567.50"),
            ("123456789", "₹12,34,56,789.00"),
        ];
        for (input, expected) in cases {
            let amount: Amount = input.parse().unwrap();
            assert_eq!(amount.display_inr(), expected, "input {input}");
        }
    }

    #[test]
    fn test_display_inr_negative() {
        let amount: Amount = "-1500".parse().unwrap();
        assert_eq!(amount.display_inr(), "-₹1,500.00");
    }

    #[test]
    fn test_deserialize_from_string() {
        let amount: Amount = serde_json::from_str("\"249.99\"").unwrap();
        assert_eq!(amount, "249.99".parse().unwrap());
    }

    #[test]
    fn test_deserialize_from_number() {
        let amount: Amount = serde_json::from_str("249.99").unwrap();
        assert_eq!(amount.display_inr(), "₹249.99");

        let amount: Amount = serde_json::from_str("4500").unwrap();
        assert_eq!(amount.display_inr(), "₹4,500.00");
    }

    #[test]
    fn test_serialize_as_string() {
        let amount: Amount = "1050.10".parse().unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"1050.10\"");
    }

    #[test]
    fn test_times_and_add() {
        let unit: Amount = "250.50".parse().unwrap();
        let line = unit.times(3);
        assert_eq!(line.to_string(), "751.50");

        let total = line.checked_add("0.50".parse().unwrap()).unwrap();
        assert_eq!(total.to_string(), "752.00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("not-a-number".parse::<Amount>().is_err());
    }
}
