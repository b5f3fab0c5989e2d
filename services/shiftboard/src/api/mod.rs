//! Shiftboard HTTP API module.
//!
//! # Purpose
//! Exposes route handler modules plus the JSON body parsing and fallback
//! helpers they share.
pub mod cors;
pub mod error;
pub mod openapi;
pub mod shifts;
pub mod system;
pub mod tenants;
pub mod types;

use crate::api::error::{ApiError, api_bad_request, api_not_found, api_payload_too_large};
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

/// Decode a buffered request body, answering extractor failures in the
/// same `{"error": ...}` shape as validation errors.
pub(crate) fn read_json_body<T: DeserializeOwned>(
    body: Result<Bytes, BytesRejection>,
) -> Result<T, ApiError> {
    let body = body.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "request body rejected");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            api_payload_too_large("request body too large")
        } else {
            api_bad_request("invalid json")
        }
    })?;
    parse_json_body(&body)
}

/// Decode a JSON request body regardless of its `Content-Type`.
///
/// Any syntax or type error maps to `400 invalid json`; field-level checks
/// are left to the handler so they run after parsing succeeds.
pub(crate) fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| {
        tracing::debug!(error = %err, "rejecting request body");
        api_bad_request("invalid json")
    })
}

pub(crate) async fn not_found() -> ApiError {
    api_not_found("not found")
}
