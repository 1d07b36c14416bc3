//! The module contains the errors the engine can return.
//!
//! Field validation errors ([`MissingFields`], [`InvalidAmount`],
//! [`EmptyDescription`], [`InvalidDate`]) are reported one at a time, in the
//! order the rules are checked. Store-level constraint violations are
//! collected together in [`Validation`].
//!
//!  [`MissingFields`]: EngineError::MissingFields
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`EmptyDescription`]: EngineError::EmptyDescription
//!  [`InvalidDate`]: EngineError::InvalidDate
//!  [`Validation`]: EngineError::Validation
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Invalid amount")]
    InvalidAmount,
    #[error("Description cannot be empty")]
    EmptyDescription,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Validation Error")]
    Validation(Vec<String>),
    #[error("{0} not found")]
    KeyNotFound(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` for errors caused by the request content.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Database(_))
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MissingFields, Self::MissingFields) => true,
            (Self::InvalidAmount, Self::InvalidAmount) => true,
            (Self::EmptyDescription, Self::EmptyDescription) => true,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
