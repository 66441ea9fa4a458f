//! Summary error types.

use thiserror::Error;

/// Errors that can occur while aggregating a year.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    /// A running total left the representable range.
    #[error("Amounts for {0} are too large to total")]
    Overflow(String),
}
