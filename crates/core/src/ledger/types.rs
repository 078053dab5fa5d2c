//! Request payloads for creating and updating ledger entries.
//!
//! Validation lives here so every write path runs the same rules.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::entry::{EntryFields, EntryKind};

/// Client-supplied entry content for create and update.
///
/// On create, `date` is ignored and the server clock is used instead. On
/// update, an absent `date` keeps the stored one.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EntryInput {
    /// Amount, strictly positive, below 10^15 with at most four decimals.
    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,
    /// `income` or `expense`.
    #[serde(rename = "type")]
    #[validate(custom(function = "validate_kind"))]
    pub kind: String,
    /// Category, 2 to 30 characters.
    #[validate(length(min = 2, max = 30, message = "must be between 2 and 30 characters"))]
    pub category: String,
    /// Optional description.
    #[serde(default)]
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub description: String,
    /// Optional occurrence date.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl EntryInput {
    /// Converts validated input into entry fields.
    ///
    /// Call only after [`Validate::validate`] succeeded; an unknown kind is
    /// reported as a validation error rather than a panic.
    pub(crate) fn to_fields(&self) -> Result<EntryFields, ValidationError> {
        let kind = self.kind.parse::<EntryKind>().map_err(|_| kind_error())?;
        Ok(EntryFields {
            amount: self.amount,
            kind,
            category: self.category.clone(),
            description: self.description.clone(),
        })
    }
}

/// Decimal places the amount column stores.
const MAX_SCALE: u32 = 4;

/// Exclusive upper bound matching `NUMERIC(19, 4)`.
const AMOUNT_LIMIT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0); // 10^15

fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        return Err(ValidationError::new("positive")
            .with_message(Cow::Borrowed("must be greater than zero")));
    }
    if amount.normalize().scale() > MAX_SCALE {
        return Err(ValidationError::new("scale")
            .with_message(Cow::Borrowed("must have at most 4 decimal places")));
    }
    if *amount >= AMOUNT_LIMIT {
        return Err(ValidationError::new("range")
            .with_message(Cow::Borrowed("must be less than 1000000000000000")));
    }
    Ok(())
}

fn validate_kind(kind: &str) -> Result<(), ValidationError> {
    kind.parse::<EntryKind>().map(|_| ()).map_err(|_| kind_error())
}

fn kind_error() -> ValidationError {
    ValidationError::new("one_of").with_message(Cow::Borrowed("must be 'income' or 'expense'"))
}
