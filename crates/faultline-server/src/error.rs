//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It
//! implements `axum::response::IntoResponse` to produce structured JSON
//! error responses with appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Entity not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Resource conflict (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        let detail = ApiErrorDetail {
            code: code.to_string(),
            message: self.to_string(),
        };
        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });
        (status, axum::Json(body)).into_response()
    }
}

impl From<faultline_core::GraphError> for ApiError {
    fn from(err: faultline_core::GraphError) -> Self {
        match &err {
            faultline_core::GraphError::UnknownVersion(_)
            | faultline_core::GraphError::NodeNotFound(_) => ApiError::NotFound(err.to_string()),
            faultline_core::GraphError::StaleSnapshot(_) => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<faultline_core::ConfigError> for ApiError {
    fn from(err: faultline_core::ConfigError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<faultline_feedback::FeedbackError> for ApiError {
    fn from(err: faultline_feedback::FeedbackError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
