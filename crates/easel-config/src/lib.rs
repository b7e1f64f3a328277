#![allow(clippy::must_use_candidate)]

pub mod bedrock;
mod env;
mod loader;
pub mod output;
pub mod telemetry;

use serde::Deserialize;

pub use bedrock::*;
pub use output::*;
pub use telemetry::{MetricSettings, OtlpConfig, OtlpProtocol, TelemetryConfig, TraceSettings};

/// Top-level Easel configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Bedrock runtime connection settings
    #[serde(default)]
    pub bedrock: BedrockConfig,
    /// Where generated artifacts are written
    #[serde(default)]
    pub output: OutputConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
