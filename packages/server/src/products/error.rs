use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Message returned to callers in place of storage diagnostics.
pub const INTERNAL_MESSAGE: &str = "Unexpected error, check server logs";

/// Failure categories surfaced by [`ProductService`](super::ProductService).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A surrogate id or natural-key term did not resolve to a row.
    #[error("{0}")]
    NotFound(String),
    /// A unique constraint was violated. Carries the storage engine's detail.
    #[error("{0}")]
    Conflict(String),
    /// Any other storage failure. The cause has already been logged.
    #[error("{INTERNAL_MESSAGE}")]
    Internal,
}

/// Capability query over a storage error type.
///
/// Each backend implements this once so callers never match on
/// engine-specific state codes.
pub trait StorageErrorExt {
    /// Returns the engine's detail message if this error is a uniqueness violation.
    fn unique_violation(&self) -> Option<String>;

    fn is_unique_violation(&self) -> bool {
        self.unique_violation().is_some()
    }
}

impl StorageErrorExt for DbErr {
    fn unique_violation(&self) -> Option<String> {
        match self.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Some(detail),
            _ => None,
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        if let Some(detail) = err.unique_violation() {
            tracing::debug!("Unique constraint violated: {detail}");
            return ServiceError::Conflict(detail);
        }
        tracing::error!(error = ?err, "Storage failure: {err}");
        ServiceError::Internal
    }
}
