use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use url::Url;

/// Telemetry configuration
///
/// Logs always go to stderr. Traces and metrics leave the process only when
/// an `[telemetry.otlp]` collector is configured.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Reported as `service.name`
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Extra resource attributes attached to every signal
    #[serde(default)]
    pub resource_attributes: BTreeMap<String, String>,
    /// Collector receiving traces and metrics
    #[serde(default)]
    pub otlp: Option<OtlpConfig>,
    #[serde(default)]
    pub traces: TraceSettings,
    #[serde(default)]
    pub metrics: MetricSettings,
}

/// OTLP collector connection
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OtlpConfig {
    pub endpoint: Url,
    #[serde(default)]
    pub protocol: OtlpProtocol,
    /// How often metrics are pushed
    #[serde(default = "default_export_interval", deserialize_with = "deserialize_interval")]
    pub export_interval: Duration,
}

/// Wire protocol spoken to the collector
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OtlpProtocol {
    #[default]
    Grpc,
    /// Protobuf over HTTP
    Http,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraceSettings {
    #[serde(default = "enabled")]
    pub export: bool,
    /// Fraction of root spans kept, 0.0 to 1.0
    #[serde(default = "default_sample_ratio")]
    pub sample_ratio: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricSettings {
    #[serde(default = "enabled")]
    pub export: bool,
}

impl TelemetryConfig {
    /// Collector for traces, if traces are exported
    pub fn trace_collector(&self) -> Option<&OtlpConfig> {
        self.otlp.as_ref().filter(|_| self.traces.export)
    }

    /// Collector for metrics, if metrics are exported
    pub fn metric_collector(&self) -> Option<&OtlpConfig> {
        self.otlp.as_ref().filter(|_| self.metrics.export)
    }
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self {
            export: true,
            sample_ratio: default_sample_ratio(),
        }
    }
}

impl Default for MetricSettings {
    fn default() -> Self {
        Self { export: true }
    }
}

fn default_service_name() -> String {
    "easel".to_string()
}

const fn enabled() -> bool {
    true
}

const fn default_sample_ratio() -> f64 {
    1.0
}

const fn default_export_interval() -> Duration {
    Duration::from_secs(30)
}

fn deserialize_interval<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    duration_str::parse(&raw).map_err(|e| serde::de::Error::custom(format!("invalid export_interval '{raw}': {e}")))
}
