//! Expense records.
//!
//! An `Expense` is a single monetary transaction entry. Amounts are stored as
//! integer cents in the `amount_minor` column.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine, money};

/// Maximum number of characters in a description.
pub const DESCRIPTION_MAX_LEN: usize = 255;
/// Maximum number of characters in a category label.
pub const CATEGORY_MAX_LEN: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i32,
    pub amount: MoneyCents,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable fields as received from a caller, before validation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub amount: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

/// Editable fields after validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseFields {
    pub amount: MoneyCents,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl ExpenseFields {
    /// Validates a draft, reporting the first rule that fails.
    ///
    /// Rules, in order: every field present, amount numeric and `> 0` once
    /// rounded to cents, description not blank, date formatted `YYYY-MM-DD`.
    pub fn parse(draft: ExpenseDraft) -> ResultEngine<Self> {
        let (Some(amount), Some(description), Some(category), Some(date)) = (
            present(draft.amount),
            present(draft.description),
            present(draft.category),
            present(draft.date),
        ) else {
            return Err(EngineError::MissingFields);
        };

        let amount: MoneyCents = amount.parse()?;
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount);
        }
        if description.trim().is_empty() {
            return Err(EngineError::EmptyDescription);
        }
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| EngineError::InvalidDate(date.clone()))?;

        Ok(Self {
            amount,
            description,
            category,
            date,
        })
    }

    /// Checks the column constraints of the `expenses` table, collecting every
    /// violation.
    pub(crate) fn check_store_constraints(&self) -> ResultEngine<()> {
        let mut violations = Vec::new();
        if self.amount > MoneyCents::MAX_EXPENSE {
            violations.push(money::max_expense_violation());
        }
        if self.description.chars().count() > DESCRIPTION_MAX_LEN {
            violations.push(format!(
                "description must be at most {DESCRIPTION_MAX_LEN} characters"
            ));
        }
        if self.category.chars().count() > CATEGORY_MAX_LEN {
            violations.push(format!(
                "category must be at most {CATEGORY_MAX_LEN} characters"
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Validation(violations))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub amount_minor: i64,
    pub description: String,
    pub category: String,
    pub date: Date,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Expense {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            amount: MoneyCents::new(model.amount_minor),
            description: model.description,
            category: model.category,
            date: model.date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(amount: &str, description: &str, category: &str, date: &str) -> ExpenseDraft {
        ExpenseDraft {
            amount: Some(amount.to_string()),
            description: Some(description.to_string()),
            category: Some(category.to_string()),
            date: Some(date.to_string()),
        }
    }

    #[test]
    fn parse_accepts_valid_draft() {
        let fields =
            ExpenseFields::parse(draft("12.5", "Lunch", "Food & Dining", "2024-03-01")).unwrap();
        assert_eq!(fields.amount, MoneyCents::new(1250));
        assert_eq!(fields.description, "Lunch");
        assert_eq!(fields.category, "Food & Dining");
        assert_eq!(fields.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn parse_requires_every_field() {
        let mut missing = draft("1", "x", "Other", "2024-01-01");
        missing.category = None;
        assert_eq!(
            ExpenseFields::parse(missing),
            Err(EngineError::MissingFields)
        );

        let empty = draft("1", "", "Other", "2024-01-01");
        assert_eq!(ExpenseFields::parse(empty), Err(EngineError::MissingFields));

        assert_eq!(
            ExpenseFields::parse(ExpenseDraft::default()),
            Err(EngineError::MissingFields)
        );
    }

    #[test]
    fn parse_rejects_non_positive_or_non_numeric_amount() {
        for amount in ["0", "-3", "abc", "0.001"] {
            assert_eq!(
                ExpenseFields::parse(draft(amount, "x", "Other", "2024-01-01")),
                Err(EngineError::InvalidAmount),
                "{amount}"
            );
        }
    }

    #[test]
    fn parse_accepts_exponent_amounts() {
        let fields = ExpenseFields::parse(draft("2.5E2", "x", "Other", "2024-01-01")).unwrap();
        assert_eq!(fields.amount, MoneyCents::new(25_000));
    }

    #[test]
    fn parse_reports_unrepresentable_amount_as_too_large() {
        assert_eq!(
            ExpenseFields::parse(draft("1e17", "x", "Other", "2024-01-01")),
            Err(EngineError::Validation(vec![
                "amount must not exceed 99999999.99".to_string()
            ]))
        );
    }

    #[test]
    fn parse_rejects_blank_description() {
        assert_eq!(
            ExpenseFields::parse(draft("1", "   ", "Other", "2024-01-01")),
            Err(EngineError::EmptyDescription)
        );
    }

    #[test]
    fn parse_rejects_bad_date() {
        assert_eq!(
            ExpenseFields::parse(draft("1", "x", "Other", "01/02/2024")),
            Err(EngineError::InvalidDate("01/02/2024".to_string()))
        );
    }

    #[test]
    fn store_constraints_collect_all_violations() {
        let fields = ExpenseFields {
            amount: MoneyCents::new(100_000_000_00),
            description: "d".repeat(DESCRIPTION_MAX_LEN + 1),
            category: "c".repeat(CATEGORY_MAX_LEN + 1),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        let Err(EngineError::Validation(details)) = fields.check_store_constraints() else {
            panic!("expected validation error");
        };
        assert_eq!(details.len(), 3);
    }
}
