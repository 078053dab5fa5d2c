//! Core business logic for Tally.
//!
//! This crate contains the business rules with ZERO web or database
//! dependencies. Persistence is reached only through the traits in [`store`].
//!
//! # Modules
//!
//! - `auth` - Password hashing and verification
//! - `directory` - Account registration and authentication
//! - `ledger` - Income/expense entries and the balance view
//! - `store` - Persistence traits and an in-memory implementation

pub mod auth;
pub mod directory;
pub mod ledger;
pub mod store;

pub use directory::{Account, AccountDirectory, DirectoryError};
pub use ledger::{Balance, EntryInput, EntryKind, LedgerEntry, LedgerError, LedgerService, Zone};
pub use store::{AccountStore, EntryStore, MemoryStore, StoreError};
