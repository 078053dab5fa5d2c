use std::sync::Arc;

use tally_shared::auth::{LoginRequest, RegisterRequest};
use tally_shared::error::field_errors;
use tracing::warn;
use validator::Validate;

use super::{Account, DirectoryError, NewAccount, normalize_email};
use crate::auth::{PasswordError, hash_password, verify_password};
use crate::store::AccountStore;

/// Creates accounts and checks credentials.
#[derive(Clone)]
pub struct AccountDirectory {
    store: Arc<dyn AccountStore>,
}

impl std::fmt::Debug for AccountDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountDirectory").finish_non_exhaustive()
    }
}

impl AccountDirectory {
    /// Creates a directory over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Registers a new account.
    ///
    /// Name and email are trimmed (and the email lowercased) before the
    /// field rules run, so a blank name is rejected.
    ///
    /// Uniqueness is enforced by the store, so two concurrent registrations
    /// for the same email cannot both succeed.
    ///
    /// # Errors
    ///
    /// `Invalid` on bad fields, `EmailTaken` on a duplicate email, `Password`
    /// or `Store` on internal failures.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Account, DirectoryError> {
        let request = RegisterRequest {
            name: request.name.trim().to_string(),
            email: normalize_email(&request.email),
            password: request.password.clone(),
        };
        request
            .validate()
            .map_err(|e| DirectoryError::Invalid(field_errors(&e)))?;

        let password_hash = hash_password(&request.password)?;

        let account = self
            .store
            .insert_account(NewAccount {
                name: request.name,
                email: request.email,
                password_hash,
            })
            .await?;

        Ok(account)
    }

    /// Checks an email/password pair and returns the matching account.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for an unknown email, a wrong password or an
    /// unreadable stored hash; `Invalid` on malformed fields; `Store` on
    /// internal failures.
    pub async fn authenticate(&self, request: &LoginRequest) -> Result<Account, DirectoryError> {
        let request = LoginRequest {
            email: normalize_email(&request.email),
            password: request.password.clone(),
        };
        request
            .validate()
            .map_err(|e| DirectoryError::Invalid(field_errors(&e)))?;

        let Some(account) = self.store.find_account_by_email(&request.email).await?
        else {
            return Err(DirectoryError::InvalidCredentials);
        };

        match verify_password(&request.password, &account.password_hash) {
            Ok(true) => Ok(account),
            Ok(false) => Err(DirectoryError::InvalidCredentials),
            Err(PasswordError::InvalidHash) => {
                warn!(account_id = %account.id, "Stored password hash is unreadable");
                Err(DirectoryError::InvalidCredentials)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn directory() -> AccountDirectory {
        AccountDirectory::new(Arc::new(MemoryStore::new()))
    }

    fn register_request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: "A".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let account = directory()
            .register(&register_request("a@x.com", "secret1"))
            .await
            .unwrap();

        assert_eq!(account.email, "a@x.com");
        assert_eq!(account.name, "A");
        assert!(account.password_hash.starts_with("$argon2id$"));
        assert!(verify_password("secret1", &account.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let dir = directory();
        dir.register(&register_request("a@x.com", "secret1"))
            .await
            .unwrap();

        let err = dir
            .register(&register_request("A@X.com", "another1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::EmailTaken));

        // The original credentials still work; no second account replaced them.
        let account = dir
            .authenticate(&login_request("a@x.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(account.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_register_validates() {
        let err = directory()
            .register(&register_request("a@x.com", "123"))
            .await
            .unwrap_err();

        match err {
            DirectoryError::Invalid(fields) => assert!(fields.contains_key("password")),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let dir = directory();
        let mut request = register_request("a@x.com", "secret1");
        request.name = "   ".to_string();

        let err = dir.register(&request).await.unwrap_err();
        match err {
            DirectoryError::Invalid(fields) => assert!(fields.contains_key("name")),
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert!(
            dir.authenticate(&login_request("a@x.com", "secret1"))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_register_trims_name_and_email() {
        let mut request = register_request("  A@X.com ", "secret1");
        request.name = "  Ana ".to_string();

        let account = directory().register(&request).await.unwrap();
        assert_eq!(account.name, "Ana");
        assert_eq!(account.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let dir = directory();
        let registered = dir
            .register(&register_request("a@x.com", "secret1"))
            .await
            .unwrap();

        let account = dir
            .authenticate(&login_request("a@x.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(account.id, registered.id);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let dir = directory();
        dir.register(&register_request("a@x.com", "secret1"))
            .await
            .unwrap();

        let wrong_password = dir
            .authenticate(&login_request("a@x.com", "secret2"))
            .await
            .unwrap_err();
        let unknown_email = dir
            .authenticate(&login_request("b@x.com", "secret1"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, DirectoryError::InvalidCredentials));
        assert!(matches!(unknown_email, DirectoryError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[test]
    fn test_debug_hides_hash() {
        let account = Account {
            id: tally_shared::types::AccountId::new(),
            name: "A".into(),
            email: "a@x.com".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        assert!(!format!("{account:?}").contains("argon2id"));
    }
}
