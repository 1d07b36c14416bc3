//! Expenses API endpoints

use api_types::expense::{
    ExpenseDeleted, ExpenseInput, ExpenseListQuery, ExpenseListResponse, ExpenseView, Pagination,
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

/// Page size used when the client does not send `limit`.
const DEFAULT_LIMIT: u64 = 100;

fn map_expense(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        amount: expense.amount.to_string(),
        description: expense.description,
        category: expense.category,
        date: expense.date,
        created_at: expense.created_at,
        updated_at: expense.updated_at,
    }
}

fn draft_from(input: ExpenseInput) -> engine::ExpenseDraft {
    engine::ExpenseDraft {
        amount: input.amount.map(|a| a.as_text()),
        description: input.description,
        category: input.category,
        date: input.date,
    }
}

fn expense_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, ServerError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ServerError::Generic(rejection.body_text()))
}

fn json_body(
    payload: Result<Json<ExpenseInput>, JsonRejection>,
) -> Result<ExpenseInput, ServerError> {
    payload
        .map(|Json(input)| input)
        .map_err(|rejection| ServerError::Generic(rejection.body_text()))
}

pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ExpenseListQuery>, QueryRejection>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let Query(query) = query.map_err(|rejection| ServerError::Generic(rejection.body_text()))?;

    let filter = engine::ExpenseListFilter {
        category: query.category,
        range: engine::DateRange::new(query.start_date, query.end_date),
    };
    let page = state
        .engine
        .list_expenses(
            &filter,
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_LIMIT),
        )
        .await?;

    Ok(Json(ExpenseListResponse {
        expenses: page.expenses.into_iter().map(map_expense).collect(),
        pagination: Pagination {
            current_page: page.current_page,
            total_pages: page.total_pages,
            total_items: page.total_items,
        },
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<ExpenseInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let input = json_body(payload)?;
    let expense = state.engine.create_expense(draft_from(input)).await?;
    Ok((StatusCode::CREATED, Json(map_expense(expense))))
}

pub async fn update(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ExpenseInput>, JsonRejection>,
) -> Result<Json<ExpenseView>, ServerError> {
    let id = expense_id(path)?;
    let input = json_body(payload)?;
    let expense = state.engine.update_expense(id, draft_from(input)).await?;
    Ok(Json(map_expense(expense)))
}

pub async fn delete(
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<ExpenseDeleted>, ServerError> {
    let id = expense_id(path)?;
    let id = state.engine.delete_expense(id).await?;
    Ok(Json(ExpenseDeleted {
        message: "Expense deleted".to_string(),
        id,
    }))
}
