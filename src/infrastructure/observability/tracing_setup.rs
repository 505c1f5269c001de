//! Subscriber setup for console logs and OTLP span export

use opentelemetry::{trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use super::config::TracingConfig;
use crate::config::{LogFormat, LoggingConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber: env filter, console output in the
/// configured format, and OTLP span export when enabled.
///
/// `RUST_LOG` takes precedence over the configured level. An exporter that
/// fails to build leaves console logging in place.
pub fn init_tracing(logging_config: &LoggingConfig, tracing_config: &TracingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging_config.level));

    let provider = tracing_config
        .enabled
        .then(|| init_otel_tracing(tracing_config));

    let otel_layer = match &provider {
        Some(Ok(provider)) => Some(
            tracing_opentelemetry::layer()
                .with_tracer(provider.tracer(tracing_config.service_name.clone())),
        ),
        _ => None,
    };

    tracing_subscriber::registry()
        .with(console_layer(logging_config.format))
        .with(otel_layer)
        .with(filter)
        .init();

    match provider {
        Some(Ok(provider)) => {
            opentelemetry::global::set_tracer_provider(provider);
            tracing::info!(
                endpoint = %tracing_config.otlp_endpoint,
                sampling_ratio = tracing_config.sampling_ratio,
                "Exporting spans over OTLP"
            );
        }
        Some(Err(e)) => {
            tracing::warn!(error = %e, "OTLP exporter unavailable, logging to console only");
        }
        None => {
            tracing::debug!(level = %logging_config.level, format = ?logging_config.format, "Console logging ready");
        }
    }
}

fn console_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    }
}

fn sampler_for(ratio: f64) -> Sampler {
    if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    }
}

fn init_otel_tracing(
    config: &TracingConfig,
) -> Result<TracerProvider, opentelemetry::trace::TraceError> {
    let resource = Resource::new(vec![KeyValue::new(
        "service.name",
        config.service_name.clone(),
    )]);

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.otlp_endpoint)
        .build()?;

    let provider = TracerProvider::builder()
        .with_sampler(sampler_for(config.sampling_ratio))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .with_batch_exporter(exporter, runtime::Tokio)
        .build();

    Ok(provider)
}

/// Flush buffered spans and drop the global tracer provider
pub fn shutdown_tracing() {
    opentelemetry::global::shutdown_tracer_provider();
}
