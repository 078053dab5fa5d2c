//! In-memory store used by tests and local experiments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, EntryId};
use tokio::sync::RwLock;

use super::{AccountStore, EntryStore, StoreError};
use crate::directory::{Account, NewAccount};
use crate::ledger::{EntryFields, EntryKind, LedgerEntry};

/// Both stores behind two locks. Vectors keep insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: RwLock<Vec<Account>>,
    entries: RwLock<Vec<LedgerEntry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(StoreError::Conflict(format!(
                "email '{}' already registered",
                account.email
            )));
        }

        let now = Utc::now();
        let stored = Account {
            id: AccountId::new(),
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
            created_at: now,
            updated_at: now,
        };
        accounts.push(stored.clone());
        Ok(stored)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn insert_entry(
        &self,
        owner: AccountId,
        fields: &EntryFields,
        date: DateTime<Utc>,
    ) -> Result<LedgerEntry, StoreError> {
        let now = Utc::now();
        let entry = LedgerEntry {
            id: EntryId::new(),
            account_id: owner,
            amount: fields.amount,
            kind: fields.kind,
            category: fields.category.clone(),
            description: fields.description.clone(),
            date,
            created_at: now,
            updated_at: now,
        };
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn list_entries(&self, owner: AccountId) -> Result<Vec<LedgerEntry>, StoreError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.account_id == owner)
            .cloned()
            .collect())
    }

    async fn update_entry(
        &self,
        owner: AccountId,
        id: EntryId,
        fields: &EntryFields,
        date: Option<DateTime<Utc>>,
    ) -> Result<Option<LedgerEntry>, StoreError> {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries
            .iter_mut()
            .find(|e| e.id == id && e.account_id == owner)
        else {
            return Ok(None);
        };

        entry.amount = fields.amount;
        entry.kind = fields.kind;
        entry.category.clone_from(&fields.category);
        entry.description.clone_from(&fields.description);
        if let Some(date) = date {
            entry.date = date;
        }
        entry.updated_at = Utc::now();

        Ok(Some(entry.clone()))
    }

    async fn delete_entry(&self, owner: AccountId, id: EntryId) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| !(e.id == id && e.account_id == owner));
        Ok(entries.len() < before)
    }

    async fn sum_amounts(
        &self,
        owner: AccountId,
        kind: EntryKind,
    ) -> Result<Decimal, StoreError> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.account_id == owner && e.kind == kind)
            .try_fold(Decimal::ZERO, |total, e| total.checked_add(e.amount))
            .ok_or_else(|| StoreError::Backend(format!("{kind} total overflows")))
    }
}
