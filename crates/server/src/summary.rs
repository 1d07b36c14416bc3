//! Category summary endpoint

use api_types::summary::{CategorySummary, SummaryQuery};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::{ServerError, server::ServerState};

fn map_summary(row: engine::CategorySummary) -> CategorySummary {
    CategorySummary {
        category: row.category,
        total: row.total.to_string(),
        count: row.count,
        percentage: row.percentage.to_string(),
    }
}

pub async fn get(
    State(state): State<ServerState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<Vec<CategorySummary>>, ServerError> {
    let Query(query) = query.map_err(|rejection| ServerError::Generic(rejection.body_text()))?;
    let range = engine::DateRange::new(query.start_date, query.end_date);

    let rows = state.engine.summarize_by_category(&range).await?;
    tracing::debug!(?range, rows = rows.len(), "summary computed");

    Ok(Json(rows.into_iter().map(map_summary).collect()))
}
