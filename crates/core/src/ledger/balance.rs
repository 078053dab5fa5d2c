//! Income/expense totals and the derived balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether the balance is non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    /// Balance is zero or above.
    Positive,
    /// Balance is below zero.
    Negative,
}

impl Zone {
    /// Classifies a balance. Zero counts as positive.
    #[must_use]
    pub fn of(balance: Decimal) -> Self {
        if balance < Decimal::ZERO {
            Self::Negative
        } else {
            Self::Positive
        }
    }
}

/// Aggregate view over one account's entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Sum of all income amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub income_total: Decimal,
    /// Sum of all expense amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub expense_total: Decimal,
    /// `income_total - expense_total`.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    /// Sign of `balance`.
    pub financial_zone: Zone,
}

impl Balance {
    /// Builds the view from the two totals.
    #[must_use]
    pub fn from_totals(income_total: Decimal, expense_total: Decimal) -> Self {
        let balance = income_total - expense_total;
        Self {
            income_total,
            expense_total,
            balance,
            financial_zone: Zone::of(balance),
        }
    }
}

impl Default for Balance {
    fn default() -> Self {
        Self::from_totals(Decimal::ZERO, Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn amount() -> impl Strategy<Value = Decimal> {
        (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
    }

    #[test]
    fn test_empty_balance_is_positive_zero() {
        let balance = Balance::default();
        assert_eq!(balance.income_total, Decimal::ZERO);
        assert_eq!(balance.expense_total, Decimal::ZERO);
        assert_eq!(balance.balance, Decimal::ZERO);
        assert_eq!(balance.financial_zone, Zone::Positive);
    }

    #[test]
    fn test_negative_zone() {
        let balance = Balance::from_totals(dec!(10), dec!(10.01));
        assert_eq!(balance.balance, dec!(-0.01));
        assert_eq!(balance.financial_zone, Zone::Negative);
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(Balance::from_totals(dec!(50), dec!(0))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "income_total": 50.0,
                "expense_total": 0.0,
                "balance": 50.0,
                "financial_zone": "positive"
            })
        );
    }

    proptest! {
        #[test]
        fn prop_balance_is_income_minus_expense(income in amount(), expense in amount()) {
            let balance = Balance::from_totals(income, expense);
            prop_assert_eq!(balance.balance, income - expense);
        }

        #[test]
        fn prop_zone_negative_iff_balance_below_zero(income in amount(), expense in amount()) {
            let balance = Balance::from_totals(income, expense);
            prop_assert_eq!(
                balance.financial_zone == Zone::Negative,
                balance.balance < Decimal::ZERO
            );
        }
    }
}
