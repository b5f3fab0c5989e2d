//! Shiftboard HTTP service entry point.
//!
//! # Purpose
//! Loads configuration, connects the Postgres store, and serves the API until
//! an interrupt arrives, then drains in-flight requests for a bounded grace
//! period before closing the pool.
//!
//! # Notes
//! `run_with_shutdown` takes the store and the shutdown future as arguments so
//! tests can drive the full lifecycle against the in-memory store.
use anyhow::Context;
use metrics_exporter_prometheus::PrometheusHandle;
use shiftboard::app::{AppState, build_router};
use shiftboard::config::ShiftboardConfig;
use shiftboard::observability;
use shiftboard::store::ShiftboardStore;
use shiftboard::store::postgres::PostgresStore;
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ShiftboardConfig::from_env_or_yaml().context("load shiftboard config")?;
    let metrics_handle = observability::init_observability("shiftboard");
    let store = PostgresStore::connect(&config.postgres)
        .await
        .context("connect to postgres")?;
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.bind_addr))?;
    run_with_shutdown(
        listener,
        Arc::new(store),
        ServeOptions {
            metrics_handle,
            metrics_bind: config.metrics_bind,
            shutdown_grace: config.shutdown_grace,
        },
        async {
            let _ = tokio::signal::ctrl_c().await;
        },
    )
    .await
}

// Bounds pool teardown when abandoned requests still hold connections.
const STORE_CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

struct ServeOptions {
    metrics_handle: PrometheusHandle,
    metrics_bind: SocketAddr,
    shutdown_grace: Duration,
}

async fn run_with_shutdown<F>(
    listener: TcpListener,
    store: Arc<dyn ShiftboardStore>,
    options: ServeOptions,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (stop_tx, stop_rx) = watch::channel(false);
    let metrics_task = tokio::spawn(observability::serve_metrics(
        options.metrics_handle,
        options.metrics_bind,
        wait_for_stop(stop_rx.clone()),
    ));

    let app = build_router(AppState::new(Arc::clone(&store)));
    tracing::info!(
        addr = %listener.local_addr()?,
        backend = store.backend_name(),
        "shiftboard listening"
    );
    let mut server_task = tokio::spawn(
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(wait_for_stop(stop_rx))
            .into_future(),
    );

    tokio::pin!(shutdown);
    let served = tokio::select! {
        joined = &mut server_task => Some(joined),
        _ = &mut shutdown => None,
    };

    // Stop accepting connections; in-flight requests keep running.
    let _ = stop_tx.send(true);
    let result = match served {
        Some(joined) => joined
            .context("http server task failed")
            .and_then(|served| served.context("serve http")),
        None => {
            tracing::info!(grace = ?options.shutdown_grace, "shutting down");
            match tokio::time::timeout(options.shutdown_grace, &mut server_task).await {
                Ok(joined) => joined
                    .context("http server task failed")
                    .and_then(|served| served.context("serve http")),
                Err(_) => {
                    tracing::warn!("grace period elapsed with requests still in flight");
                    server_task.abort();
                    Ok(())
                }
            }
        }
    };

    match tokio::time::timeout(Duration::from_secs(1), metrics_task).await {
        Ok(Ok(Err(err))) => tracing::warn!(error = %err, "metrics listener failed"),
        Ok(_) => {}
        Err(_) => tracing::warn!("metrics listener did not stop"),
    }
    if tokio::time::timeout(STORE_CLOSE_TIMEOUT, store.close())
        .await
        .is_err()
    {
        tracing::warn!("store did not close within {STORE_CLOSE_TIMEOUT:?}");
    }
    result
}

async fn wait_for_stop(mut stop: watch::Receiver<bool>) {
    let _ = stop.wait_for(|stopped| *stopped).await;
}
