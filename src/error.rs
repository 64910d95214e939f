//! Error types for the cache engine and its HTTP adapter
//!
//! Provides unified error handling using thiserror.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Outcomes of a cache operation that are not a plain success.
///
/// `Miss` is an expected result, not a fault: callers match on it the
/// same way they would match on `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Empty key, absent value, or a bad construction parameter
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Key not present, or present but already expired
    #[error("Key not found: {0}")]
    Miss(String),
}

impl CacheError {
    /// Returns true for the `Miss` outcome.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::Miss(_))
    }
}

// == API Error Enum ==
/// Errors surfaced by the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Error returned by the cache engine
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Malformed request (bad JSON body, missing query parameter)
    #[error("{0}")]
    BadRequest(String),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::BytesRejection(e) => ApiError::Internal(e.body_text()),
            other => ApiError::BadRequest(format!("Invalid request body: {}", other.body_text())),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Cache(CacheError::Miss(_)) => StatusCode::NOT_FOUND,
            ApiError::Cache(CacheError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Aliases ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Result type returned by HTTP handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
