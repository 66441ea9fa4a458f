//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//!
//! # Modules
//!
//! - `auth` - Password hashing and credential rules
//! - `month` - Templates for newly created monthly ledgers
//! - `summary` - Yearly aggregation and highlights

pub mod auth;
pub mod month;
pub mod summary;
