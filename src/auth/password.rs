// Password policy and hashing
// Uses bcrypt for password hashing

use bcrypt::{hash, verify, DEFAULT_COST};
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Password must be 8-128 characters")]
    Length,

    #[error("Password must contain an uppercase letter, a lowercase letter and a digit")]
    Complexity,

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// Checks a candidate password against the registration policy
///
/// # Example
/// ```
/// use orchestration_engine::auth::password::validate_password;
///
/// assert!(validate_password("Sup3rSecret").is_ok());
/// assert!(validate_password("short1A").is_err());
/// assert!(validate_password("alllowercase1").is_err());
/// ```
pub fn validate_password(password: &str) -> Result<(), CredentialError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(CredentialError::Length);
    }

    let upper = password.chars().any(|c| c.is_ascii_uppercase());
    let lower = password.chars().any(|c| c.is_ascii_lowercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    if !(upper && lower && digit) {
        return Err(CredentialError::Complexity);
    }

    Ok(())
}

/// Hashes a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    hash(password, DEFAULT_COST).map_err(|e| CredentialError::Hashing(e.to_string()))
}

/// Verifies a password against a bcrypt hash
///
/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    verify(password, hash).unwrap_or(false)
}
