//! Income/expense ledger.
//!
//! - Entry domain types and the income/expense kind
//! - Validated request payloads for create and update
//! - Balance aggregation and the positive/negative zone
//! - The owner-scoped ledger service

pub mod balance;
pub mod entry;
pub mod error;
pub mod service;
pub mod types;

pub use balance::{Balance, Zone};
pub use entry::{EntryFields, EntryKind, LedgerEntry, UnknownKind};
pub use error::LedgerError;
pub use service::LedgerService;
pub use types::EntryInput;
