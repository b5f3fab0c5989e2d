//! HTTP API request/response types.
//!
//! # Purpose
//! Defines the wire payloads for the tenant and shift endpoints and the
//! OpenAPI schema generation.
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of `POST /api/tenants`. A missing or `null` `name` decodes as empty.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct TenantCreateRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
}

/// Body of `POST /api/shifts`.
///
/// Timestamps stay as text here so the handler can tell "absent" (`None`,
/// `null`, or `""`) apart from "present but malformed".
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct ShiftCreateRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tenant_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "2024-01-01T09:00:00Z")]
    pub starts_at: Option<String>,
    #[serde(default)]
    #[schema(example = "2024-01-01T17:00:00Z")]
    pub ends_at: Option<String>,
}

// Required strings treat `null` like an omitted field, leaving the
// emptiness check to handler validation.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct ShiftListQuery {
    /// Restrict results to one tenant.
    pub tenant_id: Option<String>,
}

impl ShiftListQuery {
    /// Build from raw query pairs; a repeated `tenant_id` keeps its first value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let tenant_id = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "tenant_id").then_some(value));
        Self { tenant_id }
    }
}
