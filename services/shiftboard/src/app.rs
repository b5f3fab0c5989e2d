//! Shiftboard HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! The store is the only process-wide resource. It is constructed once in
//! `main` and reaches handlers through [`AppState`], never through a global.
use crate::api;
use crate::observability;
use crate::store::ShiftboardStore;
use axum::Router;
use axum::middleware;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ShiftboardStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ShiftboardStore>) -> Self {
        Self { store }
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });

    Router::new()
        .route("/healthz", axum::routing::get(api::system::healthz))
        .route("/readyz", axum::routing::get(api::system::readyz))
        .route(
            "/api/tenants",
            axum::routing::get(api::tenants::list_tenants).post(api::tenants::create_tenant),
        )
        .route(
            "/api/shifts",
            axum::routing::get(api::shifts::list_shifts).post(api::shifts::create_shift),
        )
        .route(
            "/api/openapi.json",
            axum::routing::get(api::openapi::openapi_json),
        )
        .fallback(api::not_found)
        .layer(middleware::from_fn(api::cors::cors))
        .layer(trace_layer)
        .with_state(state)
}
