//! Credential hashing for account passwords.

mod password;

pub use password::{PasswordError, hash_password, verify_password};
