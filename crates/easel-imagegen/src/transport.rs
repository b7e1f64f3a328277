pub(crate) mod bedrock;

use async_trait::async_trait;
use thiserror::Error;

pub use bedrock::BedrockTransport;

/// Failure reported by a transport after its own retries are spent
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The service answered with a typed error
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    /// No answer arrived: timeout, connection reset, DNS failure
    #[error("no response: {0}")]
    NoResponse(String),

    /// Anything else, such as request construction or credential errors
    #[error("{0}")]
    Other(String),
}

/// Sends a JSON body to a model and returns the raw response body
///
/// Implementations own connection pooling, timeouts and retry with backoff.
/// Callers make exactly one `invoke` per operation.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError>;

    /// Short name used in logs
    fn name(&self) -> &str;
}
