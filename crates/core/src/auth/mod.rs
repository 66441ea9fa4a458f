//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id at a configurable cost
//! - Password verification
//! - Rules for changing a user's credentials

mod credentials;
mod password;

pub use credentials::{CredentialChange, CredentialError, MIN_PASSWORD_LENGTH, validate_password};
pub use password::{HashCost, PasswordError, hash_password, verify_absent, verify_password};
