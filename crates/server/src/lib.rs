use api_types::ErrorResponse;
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{ServerOptions, router, run_with_listener, spawn_with_listener};

mod categories;
mod expenses;
mod health;
mod server;
mod summary;

pub mod types {
    pub mod expense {
        pub use api_types::expense::{
            AmountInput, ExpenseDeleted, ExpenseInput, ExpenseListQuery, ExpenseListResponse,
            ExpenseView, Pagination,
        };
    }

    pub mod summary {
        pub use api_types::summary::{CategorySummary, SummaryQuery};
    }

    pub mod health {
        pub use api_types::health::Health;
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    /// The request could not be decoded (bad JSON, query or path).
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::MissingFields
        | EngineError::InvalidAmount
        | EngineError::EmptyDescription
        | EngineError::InvalidDate(_)
        | EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_for_engine_error(err: EngineError) -> ErrorResponse {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            ErrorResponse {
                error: "Internal Server Error".to_string(),
                details: None,
            }
        }
        EngineError::Validation(details) => ErrorResponse {
            error: "Validation Error".to_string(),
            details: Some(details),
        },
        other => ErrorResponse {
            error: other.to_string(),
            details: None,
        },
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => {
                if err.is_client_error() {
                    tracing::debug!("rejected request: {err}");
                }
                (status_for_engine_error(&err), body_for_engine_error(err))
            }
            ServerError::Generic(error) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error,
                    details: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
