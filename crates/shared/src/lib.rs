//! Shared types, errors, and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Fixed-point money amounts
//! - Month and year keys for ledger periods
//! - Authentication request/response types
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod types;

pub use auth::SessionUser;
pub use config::{AppConfig, MonthConflictPolicy};
pub use error::{AppError, AppResult};
pub use types::{Amount, MonthKey, Year};
