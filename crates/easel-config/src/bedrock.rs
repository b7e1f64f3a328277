use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use url::Url;

/// Connection settings for the Bedrock runtime
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BedrockConfig {
    /// AWS region hosting the image models
    #[serde(default = "default_region")]
    pub region: String,
    /// Named profile from the shared AWS config files
    #[serde(default)]
    pub profile: Option<String>,
    /// Static access key, used together with `secret_access_key`
    #[serde(default)]
    pub access_key_id: Option<SecretString>,
    /// Static secret key, used together with `access_key_id`
    #[serde(default)]
    pub secret_access_key: Option<SecretString>,
    /// Override the runtime endpoint (VPC endpoints, local emulators)
    #[serde(default)]
    pub endpoint_url: Option<Url>,
    /// Retries on top of the first attempt for throttling and transient faults
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Time allowed to establish a connection
    #[serde(default = "default_connect_timeout", deserialize_with = "deserialize_duration")]
    pub connect_timeout: Duration,
    /// Time allowed for the model to answer; image models are slow
    #[serde(default = "default_read_timeout", deserialize_with = "deserialize_duration")]
    pub read_timeout: Duration,
}

impl BedrockConfig {
    /// Total number of attempts the transport may make per call
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            profile: None,
            access_key_id: None,
            secret_access_key: None,
            endpoint_url: None,
            max_retries: default_max_retries(),
            connect_timeout: default_connect_timeout(),
            read_timeout: default_read_timeout(),
        }
    }
}

pub(crate) fn default_region() -> String {
    "us-east-1".to_string()
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

const fn default_read_timeout() -> Duration {
    Duration::from_secs(120)
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    duration_str::parse(&raw).map_err(|e| serde::de::Error::custom(format!("invalid duration '{raw}': {e}")))
}
