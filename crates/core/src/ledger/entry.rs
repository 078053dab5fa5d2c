//! Ledger entry domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, EntryId};

/// Whether an entry adds to or draws from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

impl EntryKind {
    /// Returns the wire/storage spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not exactly `income` or `expense`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entry kind '{0}', expected 'income' or 'expense'")]
pub struct UnknownKind(pub String);

impl std::str::FromStr for EntryKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// The validated, mutable content of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFields {
    /// Positive amount.
    pub amount: Decimal,
    /// Income or expense.
    pub kind: EntryKind,
    /// Free-text category.
    pub category: String,
    /// Free-text description (may be empty).
    pub description: String,
}

/// A single income or expense record owned by one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Store-assigned identifier.
    pub id: EntryId,
    /// Owning account; never exposed on the wire.
    #[serde(skip_serializing, default)]
    pub account_id: AccountId,
    /// Amount of money moved.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Free-text category.
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// When the money moved.
    pub date: DateTime<Utc>,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
    /// When the entry was last changed.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn entry(kind: EntryKind, amount: Decimal) -> LedgerEntry {
        let now = Utc::now();
        LedgerEntry {
            id: EntryId::new(),
            account_id: AccountId::new(),
            amount,
            kind,
            category: "job".into(),
            description: String::new(),
            date: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_kind_parses_exact_spelling_only() {
        assert_eq!(EntryKind::from_str("income"), Ok(EntryKind::Income));
        assert_eq!(EntryKind::from_str("expense"), Ok(EntryKind::Expense));
        assert!(EntryKind::from_str("Income").is_err());
        assert!(EntryKind::from_str("transfer").is_err());
        assert!(EntryKind::from_str("").is_err());
    }

    #[test]
    fn test_kind_display_round_trips() {
        for kind in [EntryKind::Income, EntryKind::Expense] {
            assert_eq!(EntryKind::from_str(&kind.to_string()), Ok(kind));
        }
    }

    #[test]
    fn test_wire_shape_hides_owner() {
        let entry = entry(EntryKind::Income, dec!(50));
        let json = serde_json::to_value(&entry).unwrap();

        assert!(json.get("account_id").is_none());
        assert_eq!(json["type"], "income");
        assert_eq!(json["amount"], serde_json::json!(50.0));
        assert_eq!(json["category"], "job");
    }
}
