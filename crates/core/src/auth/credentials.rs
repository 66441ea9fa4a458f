//! Credential change rules.

use thiserror::Error;

/// Minimum length, in characters, of a new password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Rule violations for a credential change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// Neither a new username nor a new password was supplied.
    #[error("Provide a new username or a new password")]
    NothingToChange,

    /// New username is blank.
    #[error("Username cannot be empty")]
    EmptyUsername,

    /// New password is too short.
    #[error("Password must be at least {min} characters")]
    PasswordTooShort {
        /// Required minimum.
        min: usize,
    },
}

/// A validated credential change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialChange {
    /// New username, if it differs from the current one.
    pub username: Option<String>,
    /// New plaintext password, to be hashed by the caller.
    pub password: Option<String>,
}

impl CredentialChange {
    /// Validates the requested change against the current username.
    ///
    /// A username equal to the current one (after trimming) is dropped so the
    /// caller does not run a uniqueness check against itself.
    ///
    /// # Errors
    ///
    /// Returns a `CredentialError` when the request breaks a rule.
    pub fn plan(
        current_username: &str,
        new_username: Option<&str>,
        new_password: Option<&str>,
    ) -> Result<Self, CredentialError> {
        if new_username.is_none() && new_password.is_none() {
            return Err(CredentialError::NothingToChange);
        }

        let username = match new_username {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(CredentialError::EmptyUsername);
                }
                (trimmed != current_username).then(|| trimmed.to_string())
            }
            None => None,
        };

        let password = match new_password {
            Some(pw) => {
                validate_password(pw)?;
                Some(pw.to_string())
            }
            None => None,
        };

        Ok(Self { username, password })
    }

    /// Returns true when nothing would be written.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }
}

/// Checks the password length rule.
///
/// # Errors
///
/// Returns `CredentialError::PasswordTooShort` below the minimum.
pub fn validate_password(password: &str) -> Result<(), CredentialError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CredentialError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}
