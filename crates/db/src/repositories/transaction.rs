//! Transaction repository for ledger entry rows.
//!
//! Every query is filtered by `user_id`; a row owned by another account is
//! indistinguishable from a missing one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tally_core::ledger::{EntryFields, EntryKind, LedgerEntry};
use tally_core::{EntryStore, StoreError};
use tally_shared::types::{AccountId, EntryId};
use uuid::Uuid;

use super::store_error;
use crate::entities::transactions;

/// Transaction repository for owner-scoped CRUD and aggregation.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a transaction owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        fields: &EntryFields,
        date: DateTime<Utc>,
    ) -> Result<transactions::Model, DbErr> {
        let now = Utc::now().into();
        let row = transactions::ActiveModel {
            id: Set(EntryId::new().into_inner()),
            user_id: Set(user_id),
            amount: Set(fields.amount),
            kind: Set(fields.kind.as_str().to_string()),
            category: Set(fields.category.clone()),
            description: Set(fields.description.clone()),
            date: Set(date.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        row.insert(&self.db).await
    }

    /// Lists a user's transactions, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<transactions::Model>, DbErr> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_asc(transactions::Column::CreatedAt)
            .order_by_asc(transactions::Column::Id)
            .all(&self.db)
            .await
    }

    /// Finds a transaction by ID, only if `user_id` owns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_owned(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<transactions::Model>, DbErr> {
        transactions::Entity::find_by_id(id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Overwrites the mutable fields of an owned transaction.
    ///
    /// A `date` of `None` keeps the stored date. Returns `Ok(None)` if the row
    /// does not exist or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn update_owned(
        &self,
        user_id: Uuid,
        id: Uuid,
        fields: &EntryFields,
        date: Option<DateTime<Utc>>,
    ) -> Result<Option<transactions::Model>, DbErr> {
        let Some(existing) = self.find_owned(user_id, id).await? else {
            return Ok(None);
        };

        let mut active: transactions::ActiveModel = existing.into();
        active.amount = Set(fields.amount);
        active.kind = Set(fields.kind.as_str().to_string());
        active.category = Set(fields.category.clone());
        active.description = Set(fields.description.clone());
        if let Some(date) = date {
            active.date = Set(date.into());
        }
        active.updated_at = Set(Utc::now().into());

        match active.update(&self.db).await {
            Ok(updated) => Ok(Some(updated)),
            // Deleted between the read and the write.
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Deletes an owned transaction. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn delete_owned(&self, user_id: Uuid, id: Uuid) -> Result<bool, DbErr> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.eq(id))
            .filter(transactions::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Sums amounts of a user's transactions of one kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn sum_by_kind(&self, user_id: Uuid, kind: EntryKind) -> Result<Decimal, DbErr> {
        let total = transactions::Entity::find()
            .select_only()
            .column_as(Expr::col(transactions::Column::Amount).sum(), "total")
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::Kind.eq(kind.as_str()))
            .into_tuple::<Option<Decimal>>()
            .one(&self.db)
            .await?
            .flatten();

        Ok(total.unwrap_or(Decimal::ZERO))
    }
}

impl TryFrom<transactions::Model> for LedgerEntry {
    type Error = StoreError;

    fn try_from(model: transactions::Model) -> Result<Self, Self::Error> {
        let kind = model
            .kind
            .parse::<EntryKind>()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self {
            id: EntryId::from_uuid(model.id),
            account_id: AccountId::from_uuid(model.user_id),
            amount: model.amount,
            kind,
            category: model.category,
            description: model.description,
            date: model.date.to_utc(),
            created_at: model.created_at.to_utc(),
            updated_at: model.updated_at.to_utc(),
        })
    }
}

#[async_trait]
impl EntryStore for TransactionRepository {
    async fn insert_entry(
        &self,
        owner: AccountId,
        fields: &EntryFields,
        date: DateTime<Utc>,
    ) -> Result<LedgerEntry, StoreError> {
        let row = self
            .create(owner.into_inner(), fields, date)
            .await
            .map_err(store_error)?;
        LedgerEntry::try_from(row)
    }

    async fn list_entries(&self, owner: AccountId) -> Result<Vec<LedgerEntry>, StoreError> {
        self.list_for_user(owner.into_inner())
            .await
            .map_err(store_error)?
            .into_iter()
            .map(LedgerEntry::try_from)
            .collect()
    }

    async fn update_entry(
        &self,
        owner: AccountId,
        id: EntryId,
        fields: &EntryFields,
        date: Option<DateTime<Utc>>,
    ) -> Result<Option<LedgerEntry>, StoreError> {
        self.update_owned(owner.into_inner(), id.into_inner(), fields, date)
            .await
            .map_err(store_error)?
            .map(LedgerEntry::try_from)
            .transpose()
    }

    async fn delete_entry(&self, owner: AccountId, id: EntryId) -> Result<bool, StoreError> {
        self.delete_owned(owner.into_inner(), id.into_inner())
            .await
            .map_err(store_error)
    }

    async fn sum_amounts(
        &self,
        owner: AccountId,
        kind: EntryKind,
    ) -> Result<Decimal, StoreError> {
        self.sum_by_kind(owner.into_inner(), kind)
            .await
            .map_err(store_error)
    }
}
