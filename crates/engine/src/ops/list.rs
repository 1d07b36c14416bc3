use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, prelude::*};

use crate::{ALL_CATEGORIES, Expense, ResultEngine, expenses};

use super::{ApplyDateRange, DateRange};
use super::super::Engine;

/// Largest value the store accepts for `LIMIT` and `OFFSET`.
const MAX_BOUND: u64 = i64::MAX as u64;

/// Filters for listing expenses.
#[derive(Clone, Debug, Default)]
pub struct ExpenseListFilter {
    /// Exact category match. Ignored when empty or equal to `"all"`.
    pub category: Option<String>,
    pub range: DateRange,
}

impl ExpenseListFilter {
    fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    }
}

/// One page of the expense listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpensePage {
    pub expenses: Vec<Expense>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

impl Engine {
    /// Lists expenses matching `filter`, newest first.
    ///
    /// Ordering is `(date DESC, created_at DESC, id DESC)`. `page` and `limit`
    /// are clamped to at least 1, and `limit` to at most `i64::MAX`. A page
    /// past the end, including one whose offset does not fit in `i64`, is
    /// empty but still reports the requested page number.
    pub async fn list_expenses(
        &self,
        filter: &ExpenseListFilter,
        page: u64,
        limit: u64,
    ) -> ResultEngine<ExpensePage> {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_BOUND);

        let mut query = expenses::Entity::find().apply_date_range(&filter.range);
        if let Some(category) = filter.category() {
            query = query.filter(expenses::Column::Category.eq(category));
        }

        let total_items = query.clone().count(&self.database).await?;
        let offset = (page - 1)
            .checked_mul(limit)
            .filter(|offset| *offset < total_items);
        let models = match offset {
            Some(offset) => {
                query
                    .order_by_desc(expenses::Column::Date)
                    .order_by_desc(expenses::Column::CreatedAt)
                    .order_by_desc(expenses::Column::Id)
                    .offset(offset)
                    .limit(limit)
                    .all(&self.database)
                    .await?
            }
            None => Vec::new(),
        };

        tracing::debug!(page, limit, total_items, "listed expenses");

        Ok(ExpensePage {
            expenses: models.into_iter().map(Expense::from).collect(),
            current_page: page,
            total_pages: total_items.div_ceil(limit),
            total_items,
        })
    }
}
