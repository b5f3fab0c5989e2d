//! Observability wiring for the shiftboard service.
//!
//! # Purpose
//! Initializes the tracing subscriber, optional OTLP span export, and the
//! Prometheus recorder behind the `/metrics` listener.
//!
//! # Notes
//! - Initialization is guarded by `OnceLock` to keep startup idempotent in tests.
//! - Spans are exported only when `OTEL_EXPORTER_OTLP_ENDPOINT` is set. The
//!   resource is built from the standard `OTEL_*` variables plus the service
//!   name.
//! - Incoming `traceparent` headers are decoded with a W3C propagator owned by
//!   this module rather than the global one.
use axum::http::HeaderMap;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use opentelemetry::propagation::{Extractor, TextMapPropagator};
use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{LazyLock, OnceLock};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
static SUBSCRIBER_INIT: OnceLock<()> = OnceLock::new();
static TRACE_CONTEXT: LazyLock<TraceContextPropagator> =
    LazyLock::new(TraceContextPropagator::new);

const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

pub fn init_observability(service_name: &str) -> PrometheusHandle {
    SUBSCRIBER_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer());
        let endpoint = std::env::var(OTLP_ENDPOINT_ENV).ok();
        match build_tracer_provider(service_name, endpoint.as_deref()) {
            Some(provider) => {
                let tracer = provider.tracer(service_name.to_string());
                let _ = registry
                    .with(tracing_opentelemetry::layer().with_tracer(tracer))
                    .try_init();
            }
            None => {
                let _ = registry.try_init();
            }
        }
    });

    install_metrics_recorder()
}

/// The exporter reads the endpoint itself; `endpoint` only gates whether one is built.
fn build_tracer_provider(service_name: &str, endpoint: Option<&str>) -> Option<SdkTracerProvider> {
    endpoint.filter(|value| !value.is_empty())?;
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()
        .inspect_err(|err| tracing::warn!(error = %err, "otlp exporter disabled"))
        .ok()?;
    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();
    Some(
        SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .with_resource(resource)
            .build(),
    )
}

/// Remote parent context carried by the request's W3C trace headers.
pub fn trace_context_from_headers(headers: &HeaderMap) -> opentelemetry::Context {
    TRACE_CONTEXT.extract(&RequestHeaders(headers))
}

struct RequestHeaders<'a>(&'a HeaderMap);

impl Extractor for RequestHeaders<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.to_str().ok()
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|name| name.as_str()).collect()
    }
}

/// Serve `GET /metrics` until `shutdown` resolves.
pub async fn serve_metrics<F>(
    handle: PrometheusHandle,
    addr: SocketAddr,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_metrics_with_listener(handle, listener, shutdown).await
}

async fn serve_metrics_with_listener<F>(
    handle: PrometheusHandle,
    listener: tokio::net::TcpListener,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = axum::Router::new().route(
        "/metrics",
        axum::routing::get(move || async move { handle.render() }),
    );
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
}

fn install_metrics_recorder() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            // A recorder installed earlier in the process wins; this handle
            // still renders its own view.
            let _ = metrics::set_global_recorder(recorder);
            handle
        })
        .clone()
}
