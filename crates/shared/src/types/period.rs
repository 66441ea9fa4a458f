//! Ledger period keys.
//!
//! A month key is the zero-padded `YYYY-MM` string that identifies one ledger
//! period. Because the format is fixed-width, lexicographic order on the
//! string equals chronological order, which the month resolver relies on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A validated `YYYY-MM` month key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey(String);

impl MonthKey {
    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the year this month belongs to.
    #[must_use]
    pub fn year(&self) -> Year {
        Year(self.0[..4].to_string())
    }

    /// Returns the month number (1-12).
    #[must_use]
    pub fn month_number(&self) -> u32 {
        self.0[5..].parse().unwrap_or_default()
    }
}

impl FromStr for MonthKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[4] == b'-'
            && bytes[5..].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(AppError::Validation(
                "Invalid month format. Use YYYY-MM".to_string(),
            ));
        }

        let month: u32 = s[5..]
            .parse()
            .map_err(|_| AppError::Validation("Invalid month format. Use YYYY-MM".to_string()))?;
        if !(1..=12).contains(&month) {
            return Err(AppError::Validation(format!(
                "Invalid month {month:02}. Month must be between 01 and 12"
            )));
        }

        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for MonthKey {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.0
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated four-digit calendar year.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Year(String);

impl Year {
    /// Returns the year as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix shared by every month key of this year (`"2025-"`).
    #[must_use]
    pub fn month_prefix(&self) -> String {
        format!("{}-", self.0)
    }
}

impl FromStr for Year {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s.to_string()))
        } else {
            Err(AppError::Validation(
                "Invalid year format. Use YYYY".to_string(),
            ))
        }
    }
}

impl TryFrom<String> for Year {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Year> for String {
    fn from(year: Year) -> Self {
        year.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2025-01")]
    #[case("1999-12")]
    #[case("0000-06")]
    fn test_month_key_accepts(#[case] input: &str) {
        let key: MonthKey = input.parse().unwrap();
        assert_eq!(key.as_str(), input);
    }

    #[rstest]
    #[case("")]
    #[case("2025-1")]
    #[case("2025/01")]
    #[case("25-01")]
    #[case("2025-001")]
    #[case("2025-0a")]
    #[case("２０２５-01")]
    #[case("2025-00")]
    #[case("2025-13")]
    #[case(" 2025-01")]
    fn test_month_key_rejects(#[case] input: &str) {
        let err = input.parse::<MonthKey>().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_month_key_orders_chronologically() {
        let dec: MonthKey = "2024-12".parse().unwrap();
        let jan: MonthKey = "2025-01".parse().unwrap();
        let feb: MonthKey = "2025-02".parse().unwrap();
        assert!(dec < jan);
        assert!(jan < feb);
    }

    #[test]
    fn test_month_key_parts() {
        let key: MonthKey = "2025-07".parse().unwrap();
        assert_eq!(key.year().as_str(), "2025");
        assert_eq!(key.month_number(), 7);
    }

    #[rstest]
    #[case("2025", true)]
    #[case("0999", true)]
    #[case("202", false)]
    #[case("20255", false)]
    #[case("20a5", false)]
    #[case("2025-01", false)]
    fn test_year_parsing(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(input.parse::<Year>().is_ok(), valid);
    }

    #[test]
    fn test_year_month_prefix() {
        let year: Year = "2025".parse().unwrap();
        assert_eq!(year.month_prefix(), "2025-");
    }

    #[test]
    fn test_month_key_serde_validates() {
        let key: MonthKey = serde_json::from_str("\"2025-03\"").unwrap();
        assert_eq!(key.to_string(), "2025-03");
        assert!(serde_json::from_str::<MonthKey>("\"March\"").is_err());
    }
}
