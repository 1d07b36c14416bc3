//! Expense store and service logic.
//!
//! The [`Engine`] owns the `expenses` table and performs validation, CRUD,
//! filtering, pagination and per-category aggregation. It keeps no state
//! between calls besides the database connection, so it can be shared across
//! concurrent requests behind an `Arc`.

use sea_orm::DatabaseConnection;

pub use error::EngineError;
pub use expenses::{
    CATEGORY_MAX_LEN, DESCRIPTION_MAX_LEN, Expense, ExpenseDraft, ExpenseFields,
};
pub use money::{MoneyCents, Percentage};
pub use ops::{CategorySummary, DateRange, ExpenseListFilter, ExpensePage};

mod error;
mod expenses;
mod money;
mod ops;

type ResultEngine<T> = Result<T, EngineError>;

/// Labels offered to clients when recording an expense.
///
/// The list is not enforced when writing: any non-empty category is stored.
pub const CATEGORIES: [&str; 10] = [
    "Food & Dining",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Bills & Utilities",
    "Healthcare",
    "Education",
    "Travel",
    "Personal Care",
    "Other",
];

/// Category filter value that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The fixed list of category labels.
    pub fn categories(&self) -> &'static [&'static str] {
        &CATEGORIES
    }

    /// Checks that the store is reachable.
    pub async fn ping(&self) -> ResultEngine<()> {
        self.database.ping().await?;
        Ok(())
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
