//! Ledger error types.

use tally_shared::types::EntryId;
use tally_shared::{AppError, FieldErrors};
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Entry content failed validation; nothing was written.
    #[error("invalid entry: {}", .0.keys().cloned().collect::<Vec<_>>().join(", "))]
    Invalid(FieldErrors),

    /// No entry with this ID is owned by the caller.
    #[error("Transaction not found: {0}")]
    NotFound(EntryId),

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::Store(StoreError::Conflict(_)) => "CONFLICT",
            Self::Store(StoreError::Backend(_)) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Invalid(_) => 400,
            Self::NotFound(_) => 404,
            Self::Store(StoreError::Conflict(_)) => 409,
            Self::Store(StoreError::Backend(_)) => 500,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Invalid(fields) => Self::Validation(fields),
            // Entries owned by someone else are reported exactly like missing ones.
            LedgerError::NotFound(_) => Self::NotFound("Transaction not found".to_string()),
            LedgerError::Store(e) => e.into(),
        }
    }
}
