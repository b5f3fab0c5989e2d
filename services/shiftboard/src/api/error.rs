//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so every endpoint answers
//! failures with the same `{"error": "..."}` body.
//!
//! # Key invariants and assumptions
//! - The `error` message is written for API callers.
//! - Status codes must align with the error category: 400 for unparseable
//!   bodies, 422 for invalid fields, 5xx for storage trouble.
//!
//! # Security considerations
//! - Store failures are logged server-side with full detail, but the response
//!   only carries the generic message chosen by the handler.
use crate::api::types::ErrorResponse;
use crate::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Structured API error returned by handlers.
///
/// # Example
/// ```rust
/// use axum::http::StatusCode;
/// use shiftboard::api::error::ApiError;
/// use shiftboard::api::types::ErrorResponse;
///
/// let err = ApiError {
///     status: StatusCode::UNPROCESSABLE_ENTITY,
///     body: ErrorResponse {
///         error: "name must be at least 2 characters".to_string(),
///     },
/// };
/// ```
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: message.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Build a 400 Bad Request error for bodies that are not valid JSON.
pub fn api_bad_request(message: &str) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, message)
}

/// Build a 422 Unprocessable Entity error for well-formed JSON with invalid fields.
pub fn api_unprocessable(message: &str) -> ApiError {
    ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, message)
}

/// Build a 413 Payload Too Large error for bodies over the extractor limit.
pub fn api_payload_too_large(message: &str) -> ApiError {
    ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, message)
}

pub fn api_not_found(message: &str) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, message)
}

/// Build a 500 Internal Server Error from a store error.
///
/// # What it does
/// Logs the store error and returns a generic internal error response.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "shiftboard storage error");
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, message)
}

/// Build a 503 Service Unavailable error when the store cannot be reached.
pub fn api_unavailable(message: &str, err: &StoreError) -> ApiError {
    tracing::warn!(error = ?err, "shiftboard storage unavailable");
    ApiError::new(StatusCode::SERVICE_UNAVAILABLE, message)
}
