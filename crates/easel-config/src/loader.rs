use std::path::Path;

use secrecy::ExposeSecret;

use crate::{BedrockConfig, Config, bedrock::default_region};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Build a configuration from the standard AWS environment variables
    ///
    /// Used when no config file is given. `AWS_REGION` selects the region and
    /// `AWS_PROFILE` the shared-config profile; everything else takes defaults.
    pub fn from_env() -> Self {
        let region = std::env::var("AWS_REGION")
            .ok()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(default_region);
        let profile = std::env::var("AWS_PROFILE").ok().filter(|p| !p.trim().is_empty());

        Self {
            bedrock: BedrockConfig {
                region,
                profile,
                ..BedrockConfig::default()
            },
            ..Self::default()
        }
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistent setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_bedrock()?;
        self.validate_output()?;
        self.validate_telemetry()?;
        Ok(())
    }

    fn validate_bedrock(&self) -> anyhow::Result<()> {
        let bedrock = &self.bedrock;

        if bedrock.region.trim().is_empty() {
            anyhow::bail!("bedrock.region must not be empty");
        }

        match (&bedrock.access_key_id, &bedrock.secret_access_key) {
            (Some(key), Some(secret)) => {
                if key.expose_secret().is_empty() || secret.expose_secret().is_empty() {
                    anyhow::bail!("bedrock static credentials must not be empty");
                }
            }
            (None, None) => {}
            _ => anyhow::bail!("bedrock.access_key_id and bedrock.secret_access_key must be set together"),
        }

        if bedrock.max_retries > 10 {
            anyhow::bail!("bedrock.max_retries exceeds maximum of 10");
        }

        if bedrock.connect_timeout.is_zero() || bedrock.read_timeout.is_zero() {
            anyhow::bail!("bedrock timeouts must be greater than 0");
        }

        Ok(())
    }

    fn validate_output(&self) -> anyhow::Result<()> {
        let directory = self.output.directory.trim();

        if directory.is_empty() {
            anyhow::bail!("output.directory must not be empty");
        }

        if Path::new(directory).is_absolute() {
            anyhow::bail!("output.directory must be relative to the workspace, got '{directory}'");
        }

        Ok(())
    }

    fn validate_telemetry(&self) -> anyhow::Result<()> {
        let Some(telemetry) = &self.telemetry else {
            return Ok(());
        };

        let ratio = telemetry.traces.sample_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            anyhow::bail!("telemetry.traces.sample_ratio must be between 0.0 and 1.0, got {ratio}");
        }

        if let Some(otlp) = &telemetry.otlp
            && otlp.export_interval.is_zero()
        {
            anyhow::bail!("telemetry.otlp.export_interval must be greater than zero");
        }

        Ok(())
    }
}
