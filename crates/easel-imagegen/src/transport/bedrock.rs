//! Bedrock runtime transport using `InvokeModel`

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_bedrockruntime::primitives::Blob;
use easel_config::BedrockConfig;
use secrecy::ExposeSecret;

use super::{ModelTransport, TransportError};

/// Transport backed by the AWS SDK
///
/// Retries run inside the SDK in adaptive mode, so throttling and transient
/// faults are retried with exponential backoff and jitter before a
/// [`TransportError`] surfaces.
#[derive(Debug, Clone)]
pub struct BedrockTransport {
    client: BedrockClient,
}

impl BedrockTransport {
    /// Build a client from configuration
    ///
    /// Static credentials win over the profile; with neither the default
    /// provider chain applies.
    pub async fn new(config: &BedrockConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .retry_config(RetryConfig::adaptive().with_max_attempts(config.max_attempts()))
            .timeout_config(
                TimeoutConfig::builder()
                    .connect_timeout(config.connect_timeout)
                    .read_timeout(config.read_timeout)
                    .build(),
            );

        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint.as_str().trim_end_matches('/'));
        }

        if let (Some(access_key), Some(secret_key)) = (&config.access_key_id, &config.secret_access_key) {
            let credentials = aws_credential_types::Credentials::new(
                access_key.expose_secret(),
                secret_key.expose_secret(),
                None,
                None,
                "easel-config",
            );
            loader = loader.credentials_provider(credentials);
        }

        let sdk_config = loader.load().await;

        tracing::debug!(
            region = %config.region,
            max_attempts = config.max_attempts(),
            "bedrock transport initialized"
        );

        Self {
            client: BedrockClient::new(&sdk_config),
        }
    }
}

#[async_trait]
impl ModelTransport for BedrockTransport {
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let output = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(translate)?;

        Ok(output.body().as_ref().to_vec())
    }

    fn name(&self) -> &str {
        "bedrock"
    }
}

fn translate<E, R>(error: SdkError<E, R>) -> TransportError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match error {
        SdkError::ServiceError(context) => {
            let err = context.err();
            TransportError::Service {
                code: err.code().unwrap_or("Unknown").to_owned(),
                message: err.message().map_or_else(|| err.to_string(), str::to_owned),
            }
        }
        SdkError::TimeoutError(_) => TransportError::NoResponse("request timed out".to_owned()),
        SdkError::DispatchFailure(failure) if failure.is_timeout() || failure.is_io() => {
            TransportError::NoResponse(format!("{failure:?}"))
        }
        other => TransportError::Other(DisplayErrorContext(&other).to_string()),
    }
}
