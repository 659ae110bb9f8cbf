//! Error types for the quote server

use quote_types::ValidationError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuoteError>;

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ValidationError> for QuoteError {
    fn from(e: ValidationError) -> Self {
        QuoteError::Validation(e.to_string())
    }
}
