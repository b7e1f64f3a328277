//! Programmatic configuration builder for integration tests

use std::path::Path;

use easel_config::{BedrockConfig, Config, OutputConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder whose artifacts land under `workspace`
    pub fn new(workspace: &Path) -> Self {
        Self {
            config: Config {
                bedrock: BedrockConfig::default(),
                output: OutputConfig {
                    directory: "output".to_owned(),
                    workspace_dir: Some(workspace.to_path_buf()),
                },
                telemetry: None,
            },
        }
    }

    /// Point the Bedrock client at a mock endpoint with static credentials
    pub fn with_endpoint(mut self, base_url: &str) -> Self {
        self.config.bedrock.endpoint_url = Some(base_url.parse().expect("valid URL"));
        self.config.bedrock.access_key_id = Some(SecretString::from("AKIDTEST"));
        self.config.bedrock.secret_access_key = Some(SecretString::from("test-secret"));
        self.config.bedrock.region = "us-west-2".to_owned();
        self.config.bedrock.max_retries = 0;
        self
    }

    /// Set the number of retries after the first attempt
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.config.bedrock.max_retries = retries;
        self
    }

    /// Rename the artifact directory under the workspace
    pub fn with_output_directory(mut self, directory: &str) -> Self {
        directory.clone_into(&mut self.config.output.directory);
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config.validate().expect("test config is valid");
        self.config
    }
}
