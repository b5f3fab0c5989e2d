//! Shift API handlers.
//!
//! # Purpose
//! Lists shifts (optionally for one tenant) and creates shifts with
//! validated tenant references and optional RFC 3339 timestamps.
//!
//! # Validation order
//! JSON parse, then required fields, then field formats, then the store call.
//! The first failing step answers the request.
use crate::api::error::{ApiError, api_internal, api_unprocessable};
use crate::api::read_json_body;
use crate::api::types::{ShiftCreateRequest, ShiftListQuery};
use crate::app::AppState;
use crate::model::{NewShift, Shift};
use crate::store::StoreError;
use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/shifts",
    tag = "shifts",
    params(ShiftListQuery),
    responses(
        (status = 200, description = "Shifts, newest first", body = [Shift]),
        (status = 500, description = "Storage failure", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_shifts(
    Query(pairs): Query<Vec<(String, String)>>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Shift>>, ApiError> {
    let query = ShiftListQuery::from_pairs(pairs);
    let tenant_id = match query.tenant_id.as_deref() {
        None | Some("") => None,
        Some(raw) => match Uuid::parse_str(raw) {
            Ok(id) => Some(id),
            // Tenant ids are UUIDs, so nothing can belong to this one.
            Err(_) => return Ok(Json(Vec::new())),
        },
    };
    let items = state
        .store
        .list_shifts(tenant_id)
        .await
        .map_err(|err| api_internal("failed to list shifts", &err))?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/shifts",
    tag = "shifts",
    request_body = ShiftCreateRequest,
    responses(
        (status = 201, description = "Shift created", body = Shift),
        (status = 400, description = "Body is not valid JSON", body = crate::api::types::ErrorResponse),
        (status = 413, description = "Body exceeds the size limit", body = crate::api::types::ErrorResponse),
        (status = 422, description = "Missing or malformed fields, or unknown tenant", body = crate::api::types::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_shift(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body: ShiftCreateRequest = read_json_body(body)?;
    let new_shift = validate_shift(body)?;
    match state.store.create_shift(new_shift).await {
        Ok(shift) => {
            metrics::counter!("shiftboard_shifts_created_total").increment(1);
            tracing::info!(shift_id = %shift.id, tenant_id = %shift.tenant_id, "shift created");
            Ok((StatusCode::CREATED, Json(shift)))
        }
        Err(StoreError::UnknownTenant(tenant_id)) => {
            tracing::debug!(%tenant_id, "shift rejected for unknown tenant");
            Err(api_unprocessable("tenant_id does not reference an existing tenant"))
        }
        Err(err) => Err(api_internal("failed to create shift", &err)),
    }
}

fn validate_shift(body: ShiftCreateRequest) -> Result<NewShift, ApiError> {
    if body.tenant_id.is_empty() || body.title.is_empty() {
        return Err(api_unprocessable("tenant_id and title required"));
    }
    let tenant_id =
        Uuid::parse_str(&body.tenant_id).map_err(|_| api_unprocessable("invalid tenant_id"))?;
    let starts_at = parse_optional_timestamp(body.starts_at.as_deref())
        .map_err(|_| api_unprocessable("invalid starts_at format (RFC3339)"))?;
    let ends_at = parse_optional_timestamp(body.ends_at.as_deref())
        .map_err(|_| api_unprocessable("invalid ends_at format (RFC3339)"))?;
    Ok(NewShift {
        tenant_id,
        title: body.title,
        starts_at,
        ends_at,
    })
}

/// `None` and `""` both mean the field was not provided.
fn parse_optional_timestamp(
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, chrono::ParseError> {
    match value {
        None | Some("") => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw).map(|ts| Some(ts.with_timezone(&Utc))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(tenant_id: &str, title: &str) -> ShiftCreateRequest {
        ShiftCreateRequest {
            tenant_id: tenant_id.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn timestamps_accept_utc_and_offsets() {
        assert_eq!(
            parse_optional_timestamp(Some("2024-01-01T00:00:00Z")).unwrap(),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_optional_timestamp(Some("2024-01-01T09:00:00+02:00")).unwrap(),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 7, 0, 0).unwrap())
        );
    }

    #[test]
    fn empty_and_missing_timestamps_are_absent() {
        assert_eq!(parse_optional_timestamp(None).unwrap(), None);
        assert_eq!(parse_optional_timestamp(Some("")).unwrap(), None);
    }

    #[test]
    fn non_rfc3339_timestamps_are_rejected() {
        assert!(parse_optional_timestamp(Some("2024-01-01")).is_err());
        assert!(parse_optional_timestamp(Some("yesterday")).is_err());
        assert!(parse_optional_timestamp(Some("2024-01-01T00:00:00")).is_err());
    }

    #[test]
    fn required_fields_are_checked_before_formats() {
        let mut body = request("", "Night");
        body.starts_at = Some("garbage".to_string());
        let err = validate_shift(body).expect_err("missing tenant");
        assert_eq!(err.body.error, "tenant_id and title required");

        let err = validate_shift(request(&Uuid::new_v4().to_string(), "")).expect_err("title");
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn malformed_tenant_id_is_unprocessable() {
        let err = validate_shift(request("acme", "Night")).expect_err("not a uuid");
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.body.error, "invalid tenant_id");
    }

    #[test]
    fn timestamp_errors_name_the_field() {
        let tenant_id = Uuid::new_v4().to_string();
        let mut body = request(&tenant_id, "Night");
        body.ends_at = Some("tomorrow".to_string());
        let err = validate_shift(body).expect_err("bad ends_at");
        assert_eq!(err.body.error, "invalid ends_at format (RFC3339)");
    }

    #[test]
    fn valid_request_keeps_optional_fields_independent() {
        let tenant_id = Uuid::new_v4();
        let mut body = request(&tenant_id.to_string(), "Night");
        body.ends_at = Some("2024-01-02T06:00:00Z".to_string());
        let shift = validate_shift(body).expect("valid");
        assert_eq!(shift.tenant_id, tenant_id);
        assert_eq!(shift.starts_at, None);
        assert_eq!(
            shift.ends_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 6, 0, 0).unwrap())
        );
    }
}
