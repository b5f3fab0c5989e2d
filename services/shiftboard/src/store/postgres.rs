//! Postgres-backed implementation of the shiftboard store.
//!
//! # What this module is
//! Implements the `ShiftboardStore` trait using Postgres (via `sqlx`) as the
//! durable backing store for tenants and shifts.
//!
//! # Key invariants
//! - `shifts.tenant_id` references `tenants.id`; Postgres enforces it and a
//!   violation (SQLSTATE `23503`) surfaces as [`StoreError::UnknownTenant`].
//! - Each create is one `INSERT ... RETURNING` statement, so there are no
//!   partial writes and no explicit transaction is needed.
//! - Listings order by `created_at DESC`.
//!
//! # Security model / threat assumptions
//! - Database URLs may contain credentials; avoid logging them.
//! - All values are bound as parameters; the only dynamic SQL is the optional
//!   `WHERE tenant_id = $1` clause, which is a fixed string.
//!
//! # Concurrency model
//! - The store is shared across async handlers; `sqlx::PgPool` manages concurrency.
//! - Each method borrows a pooled connection for a single statement. Dropping
//!   the future (for example when the client disconnects) returns the
//!   connection to the pool.
//!
//! # Operational notes
//! - The schema is normally provisioned out of band. When enabled in the
//!   configuration, `sqlx::migrate!("./migrations")` applies the bundled schema
//!   before the server starts accepting requests.
//! - Timestamp columns are read through `::timestamptz` so schemas that use
//!   `timestamp without time zone` still decode as UTC instants.
use super::{ShiftboardStore, StoreError, StoreResult};
use crate::config::PostgresConfig;
use crate::model::{NewShift, Shift, Tenant};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Durable store backed by a bounded Postgres connection pool.
///
/// # Errors
/// - Connection and query failures are surfaced as [`StoreError`].
///
/// # Example
/// ```rust,no_run
/// use shiftboard::config::PostgresConfig;
/// use shiftboard::store::postgres::PostgresStore;
///
/// async fn open(pg: PostgresConfig) {
///     let _ = PostgresStore::connect(&pg).await;
/// }
/// ```
pub struct PostgresStore {
    pool: PgPool,
}

/// Row shape for the `tenants` table.
#[derive(Debug, Clone, FromRow)]
struct DbTenant {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

/// Row shape for the `shifts` table.
#[derive(Debug, Clone, FromRow)]
struct DbShift {
    id: Uuid,
    tenant_id: Uuid,
    title: String,
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<DbTenant> for Tenant {
    fn from(row: DbTenant) -> Self {
        Tenant {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

impl From<DbShift> for Shift {
    fn from(row: DbShift) -> Self {
        Shift {
            id: row.id,
            tenant_id: row.tenant_id,
            title: row.title,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            created_at: row.created_at,
        }
    }
}

const TENANT_COLUMNS: &str = "id, name, created_at::timestamptz AS created_at";
const SHIFT_COLUMNS: &str = "id, tenant_id, title, starts_at::timestamptz AS starts_at, \
     ends_at::timestamptz AS ends_at, created_at::timestamptz AS created_at";

impl PostgresStore {
    /// Connect to Postgres and verify the connection.
    ///
    /// # What it does
    /// Builds the pool (eagerly opening one connection), applies the bundled
    /// migrations when `pg.run_migrations` is set, and issues a `SELECT 1`.
    ///
    /// # Errors
    /// - Invalid URL, connection, migration, or pool setup failures.
    ///
    /// # Security notes
    /// - Avoid logging `pg.url` as it may contain credentials.
    pub async fn connect(pg: &PostgresConfig) -> StoreResult<Self> {
        // `max_connections` caps concurrent DB work; `acquire_timeout` bounds how
        // long a request waits for a pooled connection before failing.
        let connect_options =
            PgConnectOptions::from_str(&pg.url).context("parse postgres connection url")?;
        let pool = PgPoolOptions::new()
            .max_connections(pg.max_connections)
            .acquire_timeout(Duration::from_millis(pg.acquire_timeout_ms))
            .connect_with(connect_options)
            .await?;

        if pg.run_migrations {
            sqlx::migrate!("./migrations").run(&pool).await?;
        }

        let store = Self { pool };
        store.health_check().await?;
        Ok(store)
    }

    /// Wrap an existing pool without running migrations or probes.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShiftboardStore for PostgresStore {
    async fn list_tenants(&self) -> StoreResult<Vec<Tenant>> {
        let rows = sqlx::query_as::<_, DbTenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .inspect_err(|_| record_error("list_tenants"))?;
        Ok(rows.into_iter().map(Tenant::from).collect())
    }

    async fn create_tenant(&self, name: &str) -> StoreResult<Tenant> {
        let row = sqlx::query_as::<_, DbTenant>(&format!(
            "INSERT INTO tenants (name) VALUES ($1) RETURNING {TENANT_COLUMNS}"
        ))
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .inspect_err(|_| record_error("create_tenant"))?;
        Ok(row.into())
    }

    async fn list_shifts(&self, tenant_id: Option<Uuid>) -> StoreResult<Vec<Shift>> {
        let rows = match tenant_id {
            Some(tenant_id) => {
                sqlx::query_as::<_, DbShift>(&format!(
                    "SELECT {SHIFT_COLUMNS} FROM shifts WHERE tenant_id = $1 ORDER BY created_at DESC"
                ))
                .bind(tenant_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, DbShift>(&format!(
                    "SELECT {SHIFT_COLUMNS} FROM shifts ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .inspect_err(|_| record_error("list_shifts"))?;
        Ok(rows.into_iter().map(Shift::from).collect())
    }

    async fn create_shift(&self, shift: NewShift) -> StoreResult<Shift> {
        let insert = sqlx::query_as::<_, DbShift>(&format!(
            "INSERT INTO shifts (tenant_id, title, starts_at, ends_at) VALUES ($1, $2, $3, $4) \
             RETURNING {SHIFT_COLUMNS}"
        ))
        .bind(shift.tenant_id)
        .bind(&shift.title)
        .bind(shift.starts_at)
        .bind(shift.ends_at)
        .fetch_one(&self.pool)
        .await;
        match insert {
            Ok(row) => Ok(row.into()),
            Err(err) if is_foreign_key_violation(&err) => {
                Err(StoreError::UnknownTenant(shift.tenant_id))
            }
            Err(err) => {
                record_error("create_shift");
                Err(err.into())
            }
        }
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err
            .code()
            .map(|code| code == FOREIGN_KEY_VIOLATION)
            .unwrap_or(false);
    }
    false
}

fn record_error(op: &'static str) {
    metrics::counter!("shiftboard_store_errors_total", "op" => op).increment(1);
}
