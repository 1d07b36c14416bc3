use sea_orm::{
    FromQueryResult, QueryOrder, QuerySelect,
    prelude::*,
    sea_query::{Expr, SimpleExpr},
};

use crate::{MoneyCents, Percentage, ResultEngine, expenses};

use super::super::Engine;
use super::{ApplyDateRange, DateRange};

/// Aggregated spending for one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: String,
    pub total: MoneyCents,
    pub count: u64,
    /// Share of the grand total across every returned category.
    pub percentage: Percentage,
}

/// Summed in SQL; cast so every backend decodes it as a 64-bit integer.
const TOTAL_MINOR: &str = "CAST(SUM(amount_minor) AS BIGINT)";

#[derive(Debug, FromQueryResult)]
struct CategoryTotalRow {
    category: String,
    total_minor: i64,
    count: i64,
}

impl Engine {
    /// Sums amounts per category for expenses within `range`.
    ///
    /// Rows are ordered by total descending, then category name. Returns an
    /// empty vector when nothing matches.
    pub async fn summarize_by_category(
        &self,
        range: &DateRange,
    ) -> ResultEngine<Vec<CategorySummary>> {
        let total_expr: SimpleExpr = Expr::cust(TOTAL_MINOR);

        let rows = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Category)
            .column_as(total_expr.clone(), "total_minor")
            .column_as(Expr::col(expenses::Column::Id).count(), "count")
            .apply_date_range(range)
            .group_by(expenses::Column::Category)
            .order_by_desc(total_expr)
            .order_by_asc(expenses::Column::Category)
            .into_model::<CategoryTotalRow>()
            .all(&self.database)
            .await?;

        let grand_total: MoneyCents = rows.iter().map(|r| MoneyCents::new(r.total_minor)).sum();
        tracing::debug!(
            categories = rows.len(),
            grand_total = %grand_total,
            "summarized expenses"
        );

        Ok(rows
            .into_iter()
            .map(|row| {
                let total = MoneyCents::new(row.total_minor);
                CategorySummary {
                    category: row.category,
                    total,
                    count: u64::try_from(row.count).unwrap_or_default(),
                    percentage: Percentage::share(total, grand_total),
                }
            })
            .collect())
    }
}
