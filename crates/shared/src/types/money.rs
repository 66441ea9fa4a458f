//! Fixed-point money amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` and always carries two fractional
//! digits. Across the API boundary it is rendered as a string (`"1200.00"`) so
//! no client ever has to round a float.
//!
//! Stored amounts are `DECIMAL(12,2)`, so input is bounded by [`Amount::MAX`].
//! Arithmetic is checked and never panics.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AppError, AppResult};

/// A monetary amount with exactly two decimal places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Number of fractional digits kept for every amount.
    pub const SCALE: u32 = 2;

    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest amount a `DECIMAL(12,2)` column holds: 9 999 999 999.99.
    pub const MAX: Self = Self(Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2));

    /// Creates an amount, rounding half away from zero to two places.
    #[must_use]
    pub fn new(value: Decimal) -> Self {
        let mut rounded =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            rounded = Decimal::ZERO;
        }
        rounded.rescale(Self::SCALE);
        Self(rounded)
    }

    /// Returns the underlying decimal.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rejects input amounts that are negative or do not fit the column.
    ///
    /// `field` names the offending input in the error message.
    pub fn require_in_range(self, field: &str) -> AppResult<Self> {
        if self.is_negative() {
            return Err(AppError::Validation(format!("{field} cannot be negative")));
        }
        if self > Self::MAX {
            return Err(AppError::Validation(format!(
                "{field} cannot exceed {}",
                Self::MAX
            )));
        }
        Ok(self)
    }

    /// Adds two amounts; `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self::new)
    }

    /// Subtracts `rhs`; `None` on overflow.
    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self::new)
    }

    /// Sums `amounts`; `None` on overflow.
    pub fn checked_sum(amounts: impl IntoIterator<Item = Self>) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, Self::checked_add)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Amount {
    type Err = String;

    /// Parses user input. Blank input means zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::ZERO);
        }
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Self::new)
            .map_err(|_| format!("Invalid amount: {s}"))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

/// Deserializer for optional amounts in partial updates.
///
/// Use with `#[serde(default, deserialize_with = "...")]`: an absent field
/// stays `None`, while an explicit `null` or `""` is `Some(Amount::ZERO)`.
///
/// # Errors
///
/// Returns the deserializer's error for input that is not an amount.
pub fn deserialize_patch<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Amount>, D::Error> {
    Amount::deserialize(deserializer).map(Some)
}

/// Accepts JSON numbers, numeric strings, `""` and `null`.
struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Amount::new(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Amount::new(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Decimal::try_from(v)
            .map(Amount::new)
            .map_err(|_| E::custom(format!("amount out of range: {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Amount::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Amount::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_rounds_to_two_places() {
        assert_eq!(Amount::new(dec!(10.005)).value(), dec!(10.01));
        assert_eq!(Amount::new(dec!(10.004)).value(), dec!(10.00));
        assert_eq!(Amount::new(dec!(-2.345)).value(), dec!(-2.35));
    }

    #[test]
    fn test_amount_display_always_two_places() {
        assert_eq!(Amount::new(dec!(1200)).to_string(), "1200.00");
        assert_eq!(Amount::new(dec!(0.5)).to_string(), "0.50");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
        assert_eq!(Amount::new(dec!(-12.3)).to_string(), "-12.30");
    }

    #[test]
    fn test_amount_serializes_as_string() {
        let json = serde_json::to_string(&Amount::new(dec!(380))).unwrap();
        assert_eq!(json, "\"380.00\"");
    }

    #[test]
    fn test_amount_deserializes_lenient_input() {
        let from_number: Amount = serde_json::from_str("12.5").unwrap();
        assert_eq!(from_number.value(), dec!(12.50));

        let from_int: Amount = serde_json::from_str("400").unwrap();
        assert_eq!(from_int.value(), dec!(400));

        let from_string: Amount = serde_json::from_str("\"99.999\"").unwrap();
        assert_eq!(from_string.value(), dec!(100.00));

        let from_blank: Amount = serde_json::from_str("\"  \"").unwrap();
        assert!(from_blank.is_zero());

        let from_null: Amount = serde_json::from_str("null").unwrap();
        assert!(from_null.is_zero());
    }

    #[test]
    fn test_amount_rejects_garbage() {
        assert!(serde_json::from_str::<Amount>("\"twelve\"").is_err());
        assert!(serde_json::from_str::<Amount>("true").is_err());
    }

    #[test]
    fn test_require_in_range() {
        assert!(Amount::new(dec!(0)).require_in_range("amount").is_ok());
        assert!(Amount::new(dec!(5)).require_in_range("amount").is_ok());
        assert_eq!(
            Amount::new(dec!(9999999999.99)).require_in_range("amount").unwrap(),
            Amount::MAX
        );

        let err = Amount::new(dec!(-0.01))
            .require_in_range("actualAmount")
            .unwrap_err();
        assert_eq!(err.to_string(), "Validation error: actualAmount cannot be negative");

        let err = Amount::new(dec!(10000000000))
            .require_in_range("budgetedAmount")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: budgetedAmount cannot exceed 9999999999.99"
        );
    }

    #[test]
    fn test_max_matches_column_precision() {
        assert_eq!(Amount::MAX.to_string(), "9999999999.99");
        assert_eq!(Amount::MAX.value().scale(), 2);
    }

    #[test]
    fn test_negative_zero_is_not_negative() {
        let amount = Amount::new(dec!(-0.001));
        assert!(!amount.is_negative());
        assert_eq!(amount.to_string(), "0.00");
    }

    #[test]
    fn test_amount_arithmetic() {
        let a = Amount::new(dec!(0.10));
        let b = Amount::new(dec!(0.20));
        assert_eq!(a.checked_add(b).unwrap().value(), dec!(0.30));
        assert_eq!(a.checked_sub(b).unwrap().to_string(), "-0.10");

        let total = Amount::checked_sum([a, b, Amount::new(dec!(1))]).unwrap();
        assert_eq!(total.to_string(), "1.30");
        assert_eq!(Amount::checked_sum(Vec::new()), Some(Amount::ZERO));
    }

    #[test]
    fn test_arithmetic_overflow_is_none() {
        let huge = Amount::new(Decimal::MAX);
        assert_eq!(huge.checked_add(huge), None);
        assert_eq!(Amount::new(Decimal::MIN).checked_sub(huge), None);
        assert_eq!(Amount::checked_sum([huge, Amount::new(dec!(1))]), None);
    }

    #[test]
    fn test_parsed_out_of_range_input_is_rejected() {
        let parsed: Amount = serde_json::from_str("\"12345678901234567.89\"").unwrap();
        assert_eq!(parsed.to_string(), "12345678901234567.89");
        assert!(parsed.require_in_range("expectedAmount").is_err());
    }

    #[test]
    fn test_patch_distinguishes_absent_from_null() {
        #[derive(Deserialize)]
        struct Patch {
            #[serde(default, deserialize_with = "deserialize_patch")]
            amount: Option<Amount>,
        }

        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.amount, None);

        let null: Patch = serde_json::from_str(r#"{"amount": null}"#).unwrap();
        assert_eq!(null.amount, Some(Amount::ZERO));

        let set: Patch = serde_json::from_str(r#"{"amount": "12"}"#).unwrap();
        assert_eq!(set.amount, Some(Amount::new(dec!(12))));
    }

    proptest::proptest! {
        #[test]
        fn prop_display_has_two_fraction_digits(cents in -10_000_000i64..10_000_000i64) {
            let rendered = Amount::new(Decimal::new(cents, 2)).to_string();
            let (_, fraction) = rendered.split_once('.').unwrap();
            proptest::prop_assert_eq!(fraction.len(), 2);
            proptest::prop_assert_eq!(rendered.parse::<Amount>().unwrap().value(), Decimal::new(cents, 2));
        }
    }
}
