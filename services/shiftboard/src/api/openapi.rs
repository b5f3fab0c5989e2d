//! OpenAPI schema aggregation for the shiftboard API.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document,
//! served at `GET /api/openapi.json`.
use crate::api::{
    shifts, system, tenants,
    types::{ErrorResponse, ShiftCreateRequest, TenantCreateRequest},
};
use crate::model::{Shift, Tenant};
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "shiftboard",
        version = "v1",
        description = "Multi-tenant shift scheduling HTTP API"
    ),
    paths(
        system::healthz,
        system::readyz,
        tenants::list_tenants,
        tenants::create_tenant,
        shifts::list_shifts,
        shifts::create_shift
    ),
    components(schemas(
        ErrorResponse,
        Tenant,
        TenantCreateRequest,
        Shift,
        ShiftCreateRequest
    )),
    tags(
        (name = "system", description = "Liveness and readiness probes"),
        (name = "tenants", description = "Tenant management"),
        (name = "shifts", description = "Shift management")
    )
)]
pub struct ApiDoc;

pub(crate) async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
