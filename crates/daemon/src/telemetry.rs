//! Logging and optional OpenTelemetry export
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directives (default: `hireflow=info`)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (e.g., http://localhost:4317), needs the
//!   `telemetry` feature
//! - `OTEL_SERVICE_NAME`: Service name (default: hireflow)

use crate::config::LogFormat;
use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use tracing_subscriber::Registry;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

const DEFAULT_FILTER: &str = "hireflow=info";

/// What happened to span export during init; logged once the subscriber is live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelemetryStatus {
    NotConfigured,
    Exporting { endpoint: String },
    FeatureDisabled,
}

/// Install the global subscriber: env filter, pretty/json formatter, OTLP layer when configured
pub fn init_tracing(format: LogFormat) -> Result<TelemetryStatus> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    layers.push(match format {
        // Production: JSON structured logging
        LogFormat::Json => fmt::layer().json().boxed(),
        // Development: Pretty formatting with colors
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
    });

    let status = match std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        Err(_) => TelemetryStatus::NotConfigured,
        Ok(endpoint) => match otel_layer(&endpoint)? {
            Some(layer) => {
                layers.push(layer);
                TelemetryStatus::Exporting { endpoint }
            }
            None => TelemetryStatus::FeatureDisabled,
        },
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    Ok(status)
}

/// Flush pending spans before exit
pub fn shutdown() {
    #[cfg(feature = "telemetry")]
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(feature = "telemetry")]
fn otel_layer(endpoint: &str) -> Result<Option<BoxedLayer>> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::TracerProvider;
    use opentelemetry_sdk::Resource;

    let service_name = std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "hireflow".to_string());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;
    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            service_name.clone(),
        )]))
        .build();
    let tracer = provider.tracer(service_name);
    opentelemetry::global::set_tracer_provider(provider);

    Ok(Some(tracing_opentelemetry::layer().with_tracer(tracer).boxed()))
}

#[cfg(not(feature = "telemetry"))]
fn otel_layer(_endpoint: &str) -> Result<Option<BoxedLayer>> {
    Ok(None)
}
