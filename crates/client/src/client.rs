use api_types::{
    ErrorResponse,
    expense::{ExpenseDeleted, ExpenseInput, ExpenseListQuery, ExpenseListResponse, ExpenseView},
    health::Health,
    summary::{CategorySummary, SummaryQuery},
};
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::error::{AppError, Result};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("expense not found")]
    NotFound,
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },
    #[error("server error: {0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

type ClientResult<T> = std::result::Result<T, ClientError>;

/// Thin HTTP client for the expenses API. One method per endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|err| AppError::BaseUrl(err.to_string()))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))
    }

    pub async fn health(&self) -> ClientResult<Health> {
        let res = self
            .http
            .get(self.endpoint("api/health")?)
            .send()
            .await?;
        // 503 still carries a health body.
        if res.status() == StatusCode::SERVICE_UNAVAILABLE {
            return Ok(res.json::<Health>().await?);
        }
        decode(res).await
    }

    pub async fn list_expenses(&self, query: &ExpenseListQuery) -> ClientResult<ExpenseListResponse> {
        let res = self
            .http
            .get(self.endpoint("api/expenses")?)
            .query(query)
            .send()
            .await?;
        decode(res).await
    }

    pub async fn create_expense(&self, input: &ExpenseInput) -> ClientResult<ExpenseView> {
        let res = self
            .http
            .post(self.endpoint("api/expenses")?)
            .json(input)
            .send()
            .await?;
        decode(res).await
    }

    pub async fn update_expense(&self, id: i32, input: &ExpenseInput) -> ClientResult<ExpenseView> {
        let res = self
            .http
            .put(self.endpoint(&format!("api/expenses/{id}"))?)
            .json(input)
            .send()
            .await?;
        decode(res).await
    }

    pub async fn delete_expense(&self, id: i32) -> ClientResult<ExpenseDeleted> {
        let res = self
            .http
            .delete(self.endpoint(&format!("api/expenses/{id}"))?)
            .send()
            .await?;
        decode(res).await
    }

    pub async fn categories(&self) -> ClientResult<Vec<String>> {
        let res = self
            .http
            .get(self.endpoint("api/categories")?)
            .send()
            .await?;
        decode(res).await
    }

    pub async fn summary(&self, query: &SummaryQuery) -> ClientResult<Vec<CategorySummary>> {
        let res = self
            .http
            .get(self.endpoint("api/expenses/summary")?)
            .query(query)
            .send()
            .await?;
        decode(res).await
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> ClientResult<T> {
    if res.status().is_success() {
        return res.json::<T>().await.map_err(ClientError::Transport);
    }

    let status = res.status();
    let body = res.json::<ErrorResponse>().await.unwrap_or(ErrorResponse {
        error: "unknown error".to_string(),
        details: None,
    });

    let err = match status {
        StatusCode::NOT_FOUND => ClientError::NotFound,
        StatusCode::BAD_REQUEST => ClientError::Validation {
            message: body.error,
            details: body.details.unwrap_or_default(),
        },
        _ => ClientError::Server(body.error),
    };
    Err(err)
}
