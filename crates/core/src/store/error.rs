//! Persistence errors.

use billtrack_shared::AppError;
use thiserror::Error;

/// Errors raised by repository implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Row targeted by an update does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Table or entity name.
        entity: &'static str,
        /// Row ID.
        id: String,
    },

    /// Backend failure, passed through verbatim.
    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Create a database error.
    #[must_use]
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::Database(msg) => Self::Database(msg),
        }
    }
}
