//! Storage gateway for tenants and shifts.
//!
//! # Purpose
//! Defines the `ShiftboardStore` trait that request handlers call, the shared
//! error type, and the Postgres and in-memory backends.
//!
//! # Key invariants
//! - Every listing is ordered newest `created_at` first.
//! - A shift can only be created for an existing tenant; backends report a
//!   missing parent as [`StoreError::UnknownTenant`].
//! - Each create is a single atomic insert-and-return.
use crate::model::{NewShift, Shift, Tenant};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown tenant: {0}")]
    UnknownTenant(Uuid),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unexpected(err.into())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Unexpected(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ShiftboardStore: Send + Sync {
    async fn list_tenants(&self) -> StoreResult<Vec<Tenant>>;
    async fn create_tenant(&self, name: &str) -> StoreResult<Tenant>;

    /// List shifts, restricted to one tenant when `tenant_id` is set.
    async fn list_shifts(&self, tenant_id: Option<Uuid>) -> StoreResult<Vec<Shift>>;
    async fn create_shift(&self, shift: NewShift) -> StoreResult<Shift>;

    async fn health_check(&self) -> StoreResult<()>;
    /// Release pooled resources. Called once after the server has drained.
    async fn close(&self);
    fn backend_name(&self) -> &'static str;
}
