//! Tenant API handlers.
//!
//! # Purpose
//! Lists and creates tenants. Tenants are never updated or deleted through
//! the API.
use crate::api::error::{ApiError, api_internal, api_unprocessable};
use crate::api::read_json_body;
use crate::api::types::TenantCreateRequest;
use crate::app::AppState;
use crate::model::Tenant;
use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

pub(crate) const MIN_NAME_CHARS: usize = 2;

#[utoipa::path(
    get,
    path = "/api/tenants",
    tag = "tenants",
    responses(
        (status = 200, description = "Tenants, newest first", body = [Tenant]),
        (status = 500, description = "Storage failure", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_tenants(
    State(state): State<AppState>,
) -> Result<Json<Vec<Tenant>>, ApiError> {
    let items = state
        .store
        .list_tenants()
        .await
        .map_err(|err| api_internal("failed to list tenants", &err))?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/tenants",
    tag = "tenants",
    request_body = TenantCreateRequest,
    responses(
        (status = 201, description = "Tenant created", body = Tenant),
        (status = 400, description = "Body is not valid JSON", body = crate::api::types::ErrorResponse),
        (status = 413, description = "Body exceeds the size limit", body = crate::api::types::ErrorResponse),
        (status = 422, description = "Name shorter than 2 characters", body = crate::api::types::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_tenant(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body: TenantCreateRequest = read_json_body(body)?;
    if body.name.chars().count() < MIN_NAME_CHARS {
        return Err(api_unprocessable("name must be at least 2 characters"));
    }
    let tenant = state
        .store
        .create_tenant(&body.name)
        .await
        .map_err(|err| api_internal("failed to create tenant", &err))?;
    metrics::counter!("shiftboard_tenants_created_total").increment(1);
    tracing::info!(tenant_id = %tenant.id, "tenant created");
    Ok((StatusCode::CREATED, Json(tenant)))
}
