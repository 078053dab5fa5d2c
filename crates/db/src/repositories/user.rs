//! User repository for database operations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use tally_core::directory::{Account, NewAccount};
use tally_core::{AccountStore, StoreError};
use tally_shared::types::AccountId;

use super::store_error;
use crate::entities::users;

/// User repository for account rows.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails, including a unique
    /// violation on `email`.
    pub async fn create(&self, account: NewAccount) -> Result<users::Model, DbErr> {
        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            name: Set(account.name),
            email: Set(account.email),
            password_hash: Set(account.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }
}

impl From<users::Model> for Account {
    fn from(model: users::Model) -> Self {
        Self {
            id: AccountId::from_uuid(model.id),
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            created_at: model.created_at.to_utc(),
            updated_at: model.updated_at.to_utc(),
        }
    }
}

#[async_trait]
impl AccountStore for UserRepository {
    async fn insert_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        self.create(account).await.map(Account::from).map_err(store_error)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.find_by_email(email)
            .await
            .map(|found| found.map(Account::from))
            .map_err(store_error)
    }
}
