use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Deserializes query parameters where an empty or blank value means "not
/// set". Other values are parsed as sent.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        Some(value) if !value.trim().is_empty() => {
            value.parse().map(Some).map_err(serde::de::Error::custom)
        }
        _ => Ok(None),
    }
}

/// Error body returned by every failing endpoint.
///
/// `details` is only present for store-level validation failures and lists
/// every violated constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

pub mod health {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
        pub database: String,
    }

    impl Health {
        pub fn connected() -> Self {
            Self {
                status: "OK".to_string(),
                database: "Connected".to_string(),
            }
        }

        pub fn disconnected() -> Self {
            Self {
                status: "Error".to_string(),
                database: "Disconnected".to_string(),
            }
        }
    }
}

pub mod expense {
    use super::*;

    /// An amount as sent by clients: either a JSON number or a decimal string.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum AmountInput {
        Number(f64),
        Text(String),
    }

    impl AmountInput {
        /// Decimal text handed to the engine parser. Numbers are written out
        /// in full, never in exponent form.
        pub fn as_text(&self) -> String {
            match self {
                Self::Number(value) => value.to_string(),
                Self::Text(value) => value.clone(),
            }
        }
    }

    /// Request body for create and update.
    ///
    /// Every field is optional on the wire so that missing fields surface as a
    /// validation error instead of a deserialization failure.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct ExpenseInput {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount: Option<AmountInput>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub date: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseView {
        pub id: i32,
        /// Fixed-point amount with two fractional digits, e.g. `"12.50"`.
        pub amount: String,
        pub description: String,
        pub category: String,
        pub date: NaiveDate,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseListQuery {
        #[serde(
            default,
            deserialize_with = "empty_as_none",
            skip_serializing_if = "Option::is_none"
        )]
        pub page: Option<u64>,
        #[serde(
            default,
            deserialize_with = "empty_as_none",
            skip_serializing_if = "Option::is_none"
        )]
        pub limit: Option<u64>,
        #[serde(
            default,
            deserialize_with = "empty_as_none",
            skip_serializing_if = "Option::is_none"
        )]
        pub category: Option<String>,
        #[serde(
            default,
            deserialize_with = "empty_as_none",
            skip_serializing_if = "Option::is_none"
        )]
        pub start_date: Option<NaiveDate>,
        #[serde(
            default,
            deserialize_with = "empty_as_none",
            skip_serializing_if = "Option::is_none"
        )]
        pub end_date: Option<NaiveDate>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Pagination {
        pub current_page: u64,
        pub total_pages: u64,
        pub total_items: u64,
    }

    impl Default for Pagination {
        fn default() -> Self {
            Self {
                current_page: 1,
                total_pages: 1,
                total_items: 0,
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
        pub pagination: Pagination,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ExpenseDeleted {
        pub message: String,
        pub id: i32,
    }
}

pub mod summary {
    use super::*;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SummaryQuery {
        #[serde(
            default,
            deserialize_with = "empty_as_none",
            skip_serializing_if = "Option::is_none"
        )]
        pub start_date: Option<NaiveDate>,
        #[serde(
            default,
            deserialize_with = "empty_as_none",
            skip_serializing_if = "Option::is_none"
        )]
        pub end_date: Option<NaiveDate>,
    }

    /// One row of the per-category summary.
    ///
    /// `total` has two fractional digits and `percentage` one, both as text.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategorySummary {
        pub category: String,
        pub total: String,
        pub count: u64,
        pub percentage: String,
    }
}
