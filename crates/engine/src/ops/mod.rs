use chrono::NaiveDate;
use sea_orm::{QueryFilter, prelude::*};

use crate::expenses;

mod list;
mod summary;
mod write;

pub use list::{ExpenseListFilter, ExpensePage};
pub use summary::CategorySummary;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Inclusive date bounds; either side may be open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }
}

trait ApplyDateRange: QueryFilter + Sized {
    fn apply_date_range(self, range: &DateRange) -> Self;
}

impl<T> ApplyDateRange for T
where
    T: QueryFilter + Sized,
{
    fn apply_date_range(mut self, range: &DateRange) -> Self {
        if let Some(start) = range.start {
            self = self.filter(expenses::Column::Date.gte(start));
        }
        if let Some(end) = range.end {
            self = self.filter(expenses::Column::Date.lte(end));
        }
        self
    }
}
