//! In-memory implementation of the shiftboard store.
//!
//! # Purpose
//! Implements `ShiftboardStore` with `Vec`s guarded by `tokio::sync::RwLock`.
//! It exists for tests and local experiments that should not need Postgres.
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - Records are appended in creation order; listings walk them in reverse so
//!   the newest record comes first even when two timestamps collide.
//! - The tenant reference on a shift is checked under the tenants read lock,
//!   mirroring the foreign key the Postgres schema enforces.
use super::{ShiftboardStore, StoreError, StoreResult};
use crate::model::{NewShift, Shift, Tenant};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryStore {
    tenants: Arc<RwLock<Vec<Tenant>>>,
    shifts: Arc<RwLock<Vec<Shift>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShiftboardStore for InMemoryStore {
    async fn list_tenants(&self) -> StoreResult<Vec<Tenant>> {
        Ok(self.tenants.read().await.iter().rev().cloned().collect())
    }

    async fn create_tenant(&self, name: &str) -> StoreResult<Tenant> {
        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.tenants.write().await.push(tenant.clone());
        Ok(tenant)
    }

    async fn list_shifts(&self, tenant_id: Option<Uuid>) -> StoreResult<Vec<Shift>> {
        let items = self
            .shifts
            .read()
            .await
            .iter()
            .rev()
            .filter(|shift| tenant_id.is_none_or(|id| shift.tenant_id == id))
            .cloned()
            .collect();
        Ok(items)
    }

    async fn create_shift(&self, shift: NewShift) -> StoreResult<Shift> {
        // Tenants stay read-locked until the shift is recorded.
        let tenants = self.tenants.read().await;
        if !tenants.iter().any(|tenant| tenant.id == shift.tenant_id) {
            return Err(StoreError::UnknownTenant(shift.tenant_id));
        }
        let record = Shift {
            id: Uuid::new_v4(),
            tenant_id: shift.tenant_id,
            title: shift.title,
            starts_at: shift.starts_at,
            ends_at: shift.ends_at,
            created_at: Utc::now(),
        };
        self.shifts.write().await.push(record.clone());
        drop(tenants);
        Ok(record)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) {}

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
