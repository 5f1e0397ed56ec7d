//! Error types for Parlor.

use thiserror::Error;

/// Common error type for Parlor.
#[derive(Error, Debug)]
pub enum ParlorError {
    /// Malformed or missing input fields.
    ///
    /// Carries every violated-field message, not just the first one.
    #[error("validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The operation conflicts with current state (duplicate join, unknown sender).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ParlorError {
    /// Build a validation error from a single message.
    pub fn invalid(message: impl Into<String>) -> Self {
        ParlorError::Validation(vec![message.into()])
    }
}

// Conversion from sqlx errors
impl From<sqlx::Error> for ParlorError {
    fn from(e: sqlx::Error) -> Self {
        ParlorError::Database(e.to_string())
    }
}

/// Result type alias for Parlor operations.
pub type Result<T> = std::result::Result<T, ParlorError>;
