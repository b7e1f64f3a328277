//! Telemetry for Easel
//!
//! Structured logging through `tracing`, with optional OTLP export of traces
//! and metrics. Log output goes to stderr because stdout carries the MCP
//! protocol stream.

mod metadata;
pub mod metrics;

use easel_config::{OtlpConfig, OtlpProtocol, TelemetryConfig};
use opentelemetry::global;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub use metrics::OperationMetrics;

/// Flushes and shuts down exporters when dropped
///
/// Hold it for the lifetime of the process.
#[must_use = "dropping the guard stops telemetry export"]
pub struct TelemetryGuard {
    meter_provider: Option<SdkMeterProvider>,
    tracer_provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        // The subscriber may already be gone, so report straight to stderr
        if let Some(provider) = self.meter_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("easel: meter provider shutdown failed: {e}");
        }
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("easel: tracer provider shutdown failed: {e}");
        }
    }
}

/// Install the global subscriber and any configured OTLP exporters
///
/// An unparsable `log_filter` falls back to `info`.
///
/// # Errors
///
/// Returns an error if an OTLP exporter cannot be built
pub fn init(config: Option<&TelemetryConfig>, log_filter: &str) -> anyhow::Result<TelemetryGuard> {
    let filter = EnvFilter::try_new(log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);

    let resource = config.map(metadata::build_resource);

    let meter_provider = match (config, &resource) {
        (Some(config), Some(resource)) => config
            .metric_collector()
            .map(|otlp| meter_provider(otlp, resource.clone()))
            .transpose()?,
        _ => None,
    };
    if let Some(provider) = &meter_provider {
        global::set_meter_provider(provider.clone());
    }

    let tracer_provider = match (config, resource) {
        (Some(config), Some(resource)) => config
            .trace_collector()
            .map(|otlp| tracer_provider(otlp, config.traces.sample_ratio, resource))
            .transpose()?,
        _ => None,
    };
    let otel_layer = tracer_provider.as_ref().map(|provider| {
        global::set_tracer_provider(provider.clone());
        tracing_opentelemetry::layer().with_tracer(provider.tracer("easel"))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .init();

    Ok(TelemetryGuard {
        meter_provider,
        tracer_provider,
    })
}

fn meter_provider(otlp: &OtlpConfig, resource: Resource) -> anyhow::Result<SdkMeterProvider> {
    let exporter = match otlp.protocol {
        OtlpProtocol::Grpc => MetricExporter::builder()
            .with_tonic()
            .with_endpoint(otlp.endpoint.as_str())
            .build(),
        OtlpProtocol::Http => MetricExporter::builder()
            .with_http()
            .with_endpoint(otlp.endpoint.as_str())
            .build(),
    }
    .map_err(|e| anyhow::anyhow!("failed to build OTLP metric exporter: {e}"))?;

    let reader = PeriodicReader::builder(exporter)
        .with_interval(otlp.export_interval)
        .build();

    Ok(SdkMeterProvider::builder()
        .with_resource(resource)
        .with_reader(reader)
        .build())
}

fn tracer_provider(otlp: &OtlpConfig, sample_ratio: f64, resource: Resource) -> anyhow::Result<SdkTracerProvider> {
    let exporter = match otlp.protocol {
        OtlpProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(otlp.endpoint.as_str())
            .build(),
        OtlpProtocol::Http => SpanExporter::builder()
            .with_http()
            .with_endpoint(otlp.endpoint.as_str())
            .build(),
    }
    .map_err(|e| anyhow::anyhow!("failed to build OTLP span exporter: {e}"))?;

    Ok(SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(sampler(sample_ratio))
        .with_batch_exporter(exporter)
        .build())
}

/// Root spans are sampled by ratio; child spans follow their parent
fn sampler(ratio: f64) -> Sampler {
    let root = if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    };
    Sampler::ParentBased(Box::new(root))
}
