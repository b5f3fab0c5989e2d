//! Shift model definitions.
//!
//! # Purpose
//! Defines persisted shift records and the validated insert payload handed to
//! the store.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A scheduled work period owned by exactly one tenant.
///
/// `starts_at` and `ends_at` are independent; no ordering between them is
/// enforced. Absent values are omitted from the JSON encoding.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Shift {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Shift fields supplied by a caller; `id` and `created_at` come from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShift {
    pub tenant_id: Uuid,
    pub title: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}
