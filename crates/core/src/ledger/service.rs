//! Ledger service: owner-scoped entry CRUD and the balance view.
//!
//! The owning account always comes from the authenticated caller, never from
//! the request body. Lookups filter on that owner, so an entry belonging to
//! someone else is indistinguishable from one that does not exist.

use std::sync::Arc;

use chrono::Utc;
use tally_shared::error::field_errors;
use tally_shared::types::{AccountId, EntryId};
use validator::{Validate, ValidationErrors};

use super::balance::Balance;
use super::entry::{EntryFields, EntryKind, LedgerEntry};
use super::error::LedgerError;
use super::types::EntryInput;
use crate::store::EntryStore;

/// Ledger operations for one store.
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn EntryStore>,
}

impl std::fmt::Debug for LedgerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerService").finish_non_exhaustive()
    }
}

impl LedgerService {
    /// Creates a ledger service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn EntryStore>) -> Self {
        Self { store }
    }

    /// Records a new entry for `owner`, dated now.
    ///
    /// Any client-supplied date is ignored.
    ///
    /// # Errors
    ///
    /// `LedgerError::Invalid` if the input fails validation, `LedgerError::Store`
    /// if the write fails.
    pub async fn create(
        &self,
        owner: AccountId,
        input: &EntryInput,
    ) -> Result<LedgerEntry, LedgerError> {
        let fields = checked_fields(input)?;
        Ok(self.store.insert_entry(owner, &fields, Utc::now()).await?)
    }

    /// Lists every entry owned by `owner`. Empty when there are none.
    ///
    /// # Errors
    ///
    /// `LedgerError::Store` if the read fails.
    pub async fn list(&self, owner: AccountId) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self.store.list_entries(owner).await?)
    }

    /// Replaces amount, kind, category, description and (when given) date.
    ///
    /// ID, owner and creation time never change.
    ///
    /// # Errors
    ///
    /// `LedgerError::Invalid` if the input fails validation,
    /// `LedgerError::NotFound` if `owner` has no entry `id`.
    pub async fn update(
        &self,
        owner: AccountId,
        id: EntryId,
        input: &EntryInput,
    ) -> Result<LedgerEntry, LedgerError> {
        let fields = checked_fields(input)?;
        self.store
            .update_entry(owner, id, &fields, input.date)
            .await?
            .ok_or(LedgerError::NotFound(id))
    }

    /// Permanently deletes an owned entry.
    ///
    /// # Errors
    ///
    /// `LedgerError::NotFound` if `owner` has no entry `id`.
    pub async fn delete(&self, owner: AccountId, id: EntryId) -> Result<(), LedgerError> {
        if self.store.delete_entry(owner, id).await? {
            Ok(())
        } else {
            Err(LedgerError::NotFound(id))
        }
    }

    /// Totals income and expense for `owner` and derives the balance.
    ///
    /// # Errors
    ///
    /// `LedgerError::Store` if either sum fails.
    pub async fn balance(&self, owner: AccountId) -> Result<Balance, LedgerError> {
        let income = self.store.sum_amounts(owner, EntryKind::Income).await?;
        let expense = self.store.sum_amounts(owner, EntryKind::Expense).await?;
        Ok(Balance::from_totals(income, expense))
    }
}

/// Validates input and converts it, halting on the first failure.
fn checked_fields(input: &EntryInput) -> Result<EntryFields, LedgerError> {
    input
        .validate()
        .map_err(|e| LedgerError::Invalid(field_errors(&e)))?;

    input.to_fields().map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("type", e);
        LedgerError::Invalid(field_errors(&errors))
    })
}
