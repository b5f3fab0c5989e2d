//! Liveness and readiness handlers.
//!
//! # Purpose and responsibility
//! `GET /healthz` answers as long as the process serves HTTP; `GET /readyz`
//! additionally round-trips to the store so orchestrators can hold traffic
//! while Postgres is unreachable.
//!
//! # Key invariants and assumptions
//! - Both endpoints are side-effect free and live outside `/api`, so they do
//!   not carry CORS headers.
use crate::api::error::{ApiError, api_unavailable};
use crate::app::AppState;
use axum::extract::State;

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "system",
    responses(
        (status = 200, description = "Process is alive", body = String, content_type = "text/plain")
    )
)]
pub(crate) async fn healthz() -> &'static str {
    "ok"
}

#[utoipa::path(
    get,
    path = "/readyz",
    tag = "system",
    responses(
        (status = 200, description = "Store reachable", body = String, content_type = "text/plain"),
        (status = 503, description = "Store unreachable", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn readyz(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    state
        .store
        .health_check()
        .await
        .map_err(|err| api_unavailable("storage unavailable", &err))?;
    Ok("ok")
}
