//! Account directory: registration and credential checks.

mod error;
mod service;

pub use error::DirectoryError;
pub use service::AccountDirectory;

use chrono::{DateTime, Utc};
use tally_shared::auth::AccountInfo;
use tally_shared::types::AccountId;

/// A registered account as stored.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    /// Store-assigned identifier.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Normalised email, unique across accounts.
    pub email: String,
    /// Argon2id PHC hash of the password.
    pub password_hash: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"[hidden]")
            .finish_non_exhaustive()
    }
}

impl Account {
    /// Returns the public view of this account.
    #[must_use]
    pub fn info(&self) -> AccountInfo {
        AccountInfo {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Data needed to create an account.
#[derive(Clone)]
pub struct NewAccount {
    /// Display name.
    pub name: String,
    /// Normalised email.
    pub email: String,
    /// Argon2id PHC hash of the password.
    pub password_hash: String,
}

/// Normalises an email for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
