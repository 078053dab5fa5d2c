//! Password hashing with Argon2id.
//!
//! Hashes are stored in PHC string format so the salt and parameters travel
//! with the hash.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, Version,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// Stored hash is not an Argon2id PHC string.
    #[error("invalid password hash format")]
    InvalidHash,
}

/// Argon2id, version 0x13, default cost parameters.
fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

/// Hashes a password using Argon2id with a fresh random salt.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
///
/// # Example
///
/// ```
/// use tally_core::auth::hash_password;
///
/// let hash = hash_password("secret1").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verifies a password against a stored hash.
///
/// A wrong password is `Ok(false)`, never an error. Only a structurally broken
/// hash or an algorithm failure is reported as `Err`.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the hash is not an Argon2id PHC
/// string.
/// Returns `PasswordError::VerifyError` if verification fails unexpectedly.
///
/// # Example
///
/// ```
/// use tally_core::auth::{hash_password, verify_password};
///
/// let hash = hash_password("secret1").unwrap();
/// assert!(verify_password("secret1", &hash).unwrap());
/// assert!(!verify_password("secret2", &hash).unwrap());
/// ```
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let stored = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;
    if stored.algorithm != Algorithm::Argon2id.ident() {
        return Err(PasswordError::InvalidHash);
    }

    hasher()
        .verify_password(password.as_bytes(), &stored)
        .map_or_else(
            |e| match e {
                argon2::password_hash::Error::Password => Ok(false),
                other => Err(PasswordError::VerifyError(other.to_string())),
            },
            |()| Ok(true),
        )
}
