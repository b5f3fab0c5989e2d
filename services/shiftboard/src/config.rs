//! Service configuration.
//!
//! # Purpose
//! Loads listener addresses, Postgres pool settings, and the shutdown grace
//! period from environment variables, with an optional YAML file
//! (`SHIFTBOARD_CONFIG`) overriding individual fields.
//!
//! # Notes
//! `DATABASE_URL` is the only required setting; startup fails without it.
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_METRICS_BIND: &str = "0.0.0.0:9090";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_ACQUIRE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_SHUTDOWN_GRACE_MS: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct ShiftboardConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub postgres: PostgresConfig,
    pub shutdown_grace: Duration,
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShiftboardConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    database_url: Option<String>,
    max_connections: Option<u32>,
    acquire_timeout_ms: Option<u64>,
    run_migrations: Option<bool>,
    shutdown_grace_ms: Option<u64>,
}

impl ShiftboardConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_url(None)
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let override_cfg: ShiftboardConfigOverride = match std::env::var("SHIFTBOARD_CONFIG") {
            Ok(path) => {
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("read SHIFTBOARD_CONFIG: {path}"))?;
                serde_yaml::from_str(&contents).with_context(|| "parse shiftboard config yaml")?
            }
            Err(_) => ShiftboardConfigOverride::default(),
        };
        let mut config = Self::from_env_with_url(override_cfg.database_url.clone())?;
        override_cfg.apply(&mut config)?;
        Ok(config)
    }

    // `fallback_url` lets a config file stand in for DATABASE_URL.
    fn from_env_with_url(fallback_url: Option<String>) -> Result<Self> {
        let bind_addr = env_or("SHIFTBOARD_BIND", DEFAULT_BIND_ADDR)
            .parse()
            .with_context(|| "parse SHIFTBOARD_BIND")?;
        let metrics_bind = env_or("SHIFTBOARD_METRICS_BIND", DEFAULT_METRICS_BIND)
            .parse()
            .with_context(|| "parse SHIFTBOARD_METRICS_BIND")?;
        let url = std::env::var("DATABASE_URL")
            .ok()
            .or(fallback_url)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| anyhow!("DATABASE_URL is not set"))?;
        let max_connections = parse_env("SHIFTBOARD_PG_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let acquire_timeout_ms =
            parse_env("SHIFTBOARD_PG_ACQUIRE_TIMEOUT_MS", DEFAULT_ACQUIRE_TIMEOUT_MS)?;
        let run_migrations = parse_env("SHIFTBOARD_RUN_MIGRATIONS", false)?;
        let shutdown_grace_ms = parse_env("SHIFTBOARD_SHUTDOWN_GRACE_MS", DEFAULT_SHUTDOWN_GRACE_MS)?;
        Ok(Self {
            bind_addr,
            metrics_bind,
            postgres: PostgresConfig {
                url,
                max_connections,
                acquire_timeout_ms,
                run_migrations,
            },
            shutdown_grace: Duration::from_millis(shutdown_grace_ms),
        })
    }
}

impl ShiftboardConfigOverride {
    fn apply(self, config: &mut ShiftboardConfig) -> Result<()> {
        if let Some(value) = self.bind_addr {
            config.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = self.metrics_bind {
            config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = self.database_url {
            config.postgres.url = value;
        }
        if let Some(value) = self.max_connections {
            config.postgres.max_connections = value;
        }
        if let Some(value) = self.acquire_timeout_ms {
            config.postgres.acquire_timeout_ms = value;
        }
        if let Some(value) = self.run_migrations {
            config.postgres.run_migrations = value;
        }
        if let Some(value) = self.shutdown_grace_ms {
            config.shutdown_grace = Duration::from_millis(value);
        }
        Ok(())
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value.parse().with_context(|| format!("parse {key}")),
        Err(_) => Ok(default),
    }
}
