#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::routing::RouterIntoService;
use shiftboard::app::{AppState, build_router};
use shiftboard::model::{NewShift, Shift, Tenant};
use shiftboard::store::memory::InMemoryStore;
use shiftboard::store::{ShiftboardStore, StoreError, StoreResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

pub type TestApp = RouterIntoService<Body, ()>;

pub fn app_with_store(store: Arc<dyn ShiftboardStore>) -> TestApp {
    build_router(AppState::new(store)).into_service()
}

pub fn memory_app() -> TestApp {
    app_with_store(Arc::new(InMemoryStore::new()))
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    raw_request(method, uri, body.to_string())
}

pub fn raw_request(method: &str, uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .expect("request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub async fn read_body(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = read_body(response).await;
    serde_json::from_slice(&bytes).expect("json")
}

/// Store wrapper that counts every call reaching the storage layer.
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ShiftboardStore for CountingStore {
    async fn list_tenants(&self) -> StoreResult<Vec<Tenant>> {
        self.hit();
        self.inner.list_tenants().await
    }

    async fn create_tenant(&self, name: &str) -> StoreResult<Tenant> {
        self.hit();
        self.inner.create_tenant(name).await
    }

    async fn list_shifts(&self, tenant_id: Option<Uuid>) -> StoreResult<Vec<Shift>> {
        self.hit();
        self.inner.list_shifts(tenant_id).await
    }

    async fn create_shift(&self, shift: NewShift) -> StoreResult<Shift> {
        self.hit();
        self.inner.create_shift(shift).await
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.hit();
        Ok(())
    }

    async fn close(&self) {}

    fn backend_name(&self) -> &'static str {
        "counting"
    }
}

/// Store whose every operation fails as if Postgres were unreachable.
pub struct FailingStore;

fn unreachable_store() -> StoreError {
    StoreError::Unexpected(anyhow::anyhow!(
        "error communicating with database: Connection refused (os error 111)"
    ))
}

#[async_trait]
impl ShiftboardStore for FailingStore {
    async fn list_tenants(&self) -> StoreResult<Vec<Tenant>> {
        Err(unreachable_store())
    }

    async fn create_tenant(&self, _name: &str) -> StoreResult<Tenant> {
        Err(unreachable_store())
    }

    async fn list_shifts(&self, _tenant_id: Option<Uuid>) -> StoreResult<Vec<Shift>> {
        Err(unreachable_store())
    }

    async fn create_shift(&self, _shift: NewShift) -> StoreResult<Shift> {
        Err(unreachable_store())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Err(unreachable_store())
    }

    async fn close(&self) {}

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}
