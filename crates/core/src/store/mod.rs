//! Persistence seam for accounts and ledger entries.
//!
//! Services depend on these traits rather than on a concrete database, so the
//! same business rules run over PostgreSQL in production and over
//! [`MemoryStore`] in tests. Every entry operation is scoped by the owning
//! account; implementations must never touch rows owned by anyone else.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tally_shared::AppError;
use tally_shared::types::{AccountId, EntryId};
use thiserror::Error;

use crate::directory::{Account, NewAccount};
use crate::ledger::{EntryFields, EntryKind, LedgerEntry};

pub use memory::MemoryStore;

/// Errors surfaced by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend failed (connection, query, mapping).
    #[error("store failure: {0}")]
    Backend(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Backend(msg) => Self::Database(msg),
        }
    }
}

/// Account persistence.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persists a new account and assigns its ID.
    ///
    /// Returns `StoreError::Conflict` when the email is already registered.
    async fn insert_account(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Looks up an account by its (normalised) email.
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;
}

/// Ledger entry persistence, always scoped to an owner.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Persists a new entry for `owner` and assigns its ID.
    async fn insert_entry(
        &self,
        owner: AccountId,
        fields: &EntryFields,
        date: DateTime<Utc>,
    ) -> Result<LedgerEntry, StoreError>;

    /// Returns every entry owned by `owner` in insertion order.
    async fn list_entries(&self, owner: AccountId) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Replaces the mutable fields of an owned entry.
    ///
    /// `date` of `None` keeps the stored date. Returns `Ok(None)` when no entry
    /// with `id` is owned by `owner`.
    async fn update_entry(
        &self,
        owner: AccountId,
        id: EntryId,
        fields: &EntryFields,
        date: Option<DateTime<Utc>>,
    ) -> Result<Option<LedgerEntry>, StoreError>;

    /// Permanently removes an owned entry. Returns false if nothing matched.
    async fn delete_entry(&self, owner: AccountId, id: EntryId) -> Result<bool, StoreError>;

    /// Sums the amounts of `owner`'s entries of the given kind (zero if none).
    async fn sum_amounts(&self, owner: AccountId, kind: EntryKind)
    -> Result<Decimal, StoreError>;
}
