use serde::{Deserialize, Deserializer};
use utoipa::IntoParams;

use crate::error::AppError;

/// Page size used when the caller does not specify one.
pub const DEFAULT_LIMIT: u64 = 10;

/// `limit` / `offset` query parameters for list endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Maximum number of rows to return. Defaults to 10.
    #[param(example = 10, minimum = 1)]
    pub limit: Option<u64>,
    /// Number of rows to skip. Defaults to 0.
    #[param(example = 0)]
    pub offset: Option<u64>,
}

impl PaginationQuery {
    /// Concrete `(limit, offset)` bounds. No upper limit is imposed here.
    pub fn bounds(&self) -> (u64, u64) {
        (
            self.limit.unwrap_or(DEFAULT_LIMIT),
            self.offset.unwrap_or(0),
        )
    }
}

pub fn validate_pagination(query: &PaginationQuery) -> Result<(), AppError> {
    if query.limit == Some(0) {
        return Err(AppError::Validation("Limit must be a positive number".into()));
    }
    Ok(())
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Validate a trimmed title (1-256 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), AppError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(AppError::Validation(
            "Title must be 1-256 characters".into(),
        ));
    }
    Ok(())
}
