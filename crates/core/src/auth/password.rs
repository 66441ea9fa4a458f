//! Password hashing with Argon2id.
//!
//! Uses the Argon2id variant with a configurable cost. Verification reads
//! the parameters back from the stored PHC string, so raising the cost only
//! affects hashes produced afterwards.

use std::sync::OnceLock;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, Version,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tally_shared::config::AuthConfig;
use thiserror::Error;

static ABSENT_REFERENCE: OnceLock<String> = OnceLock::new();

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Cost parameters rejected by Argon2.
    #[error("invalid hashing cost: {0}")]
    InvalidCost(String),
}

/// Argon2 cost factor used for new hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl From<&AuthConfig> for HashCost {
    fn from(config: &AuthConfig) -> Self {
        Self {
            memory_kib: config.memory_kib,
            iterations: config.iterations,
            parallelism: config.parallelism,
        }
    }
}

impl HashCost {
    fn hasher(self) -> Result<Argon2<'static>, PasswordError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordError::InvalidCost(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hashes a password using Argon2id.
///
/// # Returns
///
/// The hashed password as a PHC string format.
///
/// # Errors
///
/// Returns `PasswordError::InvalidCost` if the cost is out of range and
/// `PasswordError::HashError` if hashing fails.
///
/// # Example
///
/// ```
/// use tally_core::auth::{HashCost, hash_password};
///
/// let hash = hash_password("my_secure_password", HashCost::default()).unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str, cost: HashCost) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    cost.hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a hash.
///
/// # Returns
///
/// `true` if the password matches, `false` otherwise.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the hash format is invalid.
/// Returns `PasswordError::VerifyError` if verification fails unexpectedly.
///
/// # Example
///
/// ```
/// use tally_core::auth::{HashCost, hash_password, verify_password};
///
/// let hash = hash_password("my_password", HashCost::default()).unwrap();
/// assert!(verify_password("my_password", &hash).unwrap());
/// assert!(!verify_password("wrong_password", &hash).unwrap());
/// ```
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

/// Runs a verification that cannot succeed, for logins naming no account.
///
/// The reference hash is built once with `cost`, so a miss costs the same
/// as checking a wrong password against a real account.
///
/// # Errors
///
/// Returns the same errors as [`hash_password`] and [`verify_password`].
pub fn verify_absent(password: &str, cost: HashCost) -> Result<(), PasswordError> {
    let reference = match ABSENT_REFERENCE.get() {
        Some(hash) => hash,
        None => {
            let hash = hash_password("no account has this password", cost)?;
            ABSENT_REFERENCE.get_or_init(|| hash)
        }
    };

    verify_password(password, reference).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> HashCost {
        HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_hash_password() {
        let password = "test_password_123!";
        let hash = hash_password(password, cheap()).unwrap();

        // Hash should be in PHC format
        assert!(hash.starts_with("$argon2id$"));
        assert_ne!(hash, password);
    }

    #[test]
    fn test_hash_records_cost() {
        let hash = hash_password("secret", cheap()).unwrap();
        assert!(hash.contains("m=1024,t=1,p=1"));
    }

    #[test]
    fn test_verify_correct_password() {
        let hash = hash_password("correct_password", cheap()).unwrap();
        assert!(verify_password("correct_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hash_password("correct_password", cheap()).unwrap();
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_across_costs() {
        let hash = hash_password("pw-123456", HashCost::default()).unwrap();
        assert!(verify_password("pw-123456", &hash).unwrap());
    }

    #[test]
    fn test_different_passwords_different_hashes() {
        let hash1 = hash_password("password1", cheap()).unwrap();
        let hash2 = hash_password("password1", cheap()).unwrap();

        // Same password should produce different hashes (due to random salt)
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }

    #[test]
    fn test_verify_absent_hashes_once() {
        verify_absent("guess-1", cheap()).unwrap();
        let reference = ABSENT_REFERENCE.get().unwrap().clone();
        assert!(reference.starts_with("$argon2id$"));
        assert!(!verify_password("guess-1", &reference).unwrap());

        verify_absent("guess-2", cheap()).unwrap();
        assert_eq!(ABSENT_REFERENCE.get().unwrap(), &reference);
    }

    #[test]
    fn test_invalid_cost_rejected() {
        let cost = HashCost {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert!(matches!(
            hash_password("pw", cost),
            Err(PasswordError::InvalidCost(_))
        ));
    }
}
