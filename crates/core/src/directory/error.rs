use tally_shared::{AppError, FieldErrors};
use thiserror::Error;

use crate::auth::PasswordError;
use crate::store::StoreError;

/// Message shared by every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Errors from registration and authentication.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Request fields failed validation.
    #[error("invalid request: {}", .0.keys().cloned().collect::<Vec<_>>().join(", "))]
    Invalid(FieldErrors),

    /// An account with this email already exists.
    #[error("email already registered")]
    EmailTaken,

    /// Unknown email or wrong password; the two are indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Store failure.
    #[error(transparent)]
    Store(StoreError),
}

impl DirectoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "VALIDATION_ERROR",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Password(_) => "INTERNAL_ERROR",
            Self::Store(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Invalid(_) => 400,
            Self::EmailTaken => 409,
            Self::InvalidCredentials => 401,
            Self::Password(_) | Self::Store(_) => 500,
        }
    }
}

impl From<StoreError> for DirectoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => Self::EmailTaken,
            other @ StoreError::Backend(_) => Self::Store(other),
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Invalid(fields) => Self::Validation(fields),
            DirectoryError::EmailTaken => {
                Self::Conflict("An account with this email already exists".to_string())
            }
            DirectoryError::InvalidCredentials => {
                Self::Unauthorized(INVALID_CREDENTIALS.to_string())
            }
            DirectoryError::Password(e) => Self::Internal(e.to_string()),
            DirectoryError::Store(e) => e.into(),
        }
    }
}
