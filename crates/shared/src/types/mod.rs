//! Common types used across the application.

pub mod money;
pub mod period;

pub use money::Amount;
pub use period::{MonthKey, Year};
