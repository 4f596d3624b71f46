//! Data-access errors.

use std::time::Duration;

use thiserror::Error;

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The store returned no row for the lookup.
    #[error("{0} not found")]
    NotFound(String),

    /// A unique constraint rejected the write.
    #[error("duplicate key violates {0}")]
    UniqueViolation(String),

    /// The call exceeded its time bound and was cancelled.
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("failed to {operation}: {source}")]
    Query {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl RepositoryError {
    /// Classify a driver error raised while running `operation`.
    pub fn from_sqlx(operation: &'static str, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound(operation.to_string()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepositoryError::UniqueViolation(
                    db.constraint().unwrap_or("unique constraint").to_string(),
                )
            }
            source => RepositoryError::Query { operation, source },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(_))
    }
}
