//! One remote call per operation, with outcome classification
//!
//! Retries happen inside the transport; by the time a failure reaches the
//! classifier they are spent.

use std::sync::Arc;

use easel_imaging::codec;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ImageGenError, RemoteErrorKind};
use crate::transport::{ModelTransport, TransportError};

/// Images returned by a successful call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Decoded image bytes in response order
    pub images: Vec<Vec<u8>>,
    /// Per-image completion signal; all `None` on success
    pub finish_reasons: Vec<Option<String>>,
}

/// Classified outcome of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationResult {
    Success(Generation),
    /// The call succeeded but the model declined to produce content
    ContentFiltered { reason: String },
    Failed { kind: RemoteErrorKind, message: String },
}

impl InvocationResult {
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Failed { kind, .. } => kind.is_retryable(),
            Self::Success(_) | Self::ContentFiltered { .. } => false,
        }
    }

    pub fn into_result(self) -> Result<Generation, ImageGenError> {
        match self {
            Self::Success(generation) => Ok(generation),
            Self::ContentFiltered { reason } => Err(ImageGenError::ContentFiltered { reason }),
            Self::Failed { kind, message } => Err(ImageGenError::remote(kind, message)),
        }
    }

    fn failed(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelResponse {
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    finish_reasons: Vec<Option<String>>,
    /// Nova reports moderation here instead of in `finish_reasons`
    #[serde(default)]
    error: Option<String>,
}

/// Sends wire bodies through a [`ModelTransport`]
#[derive(Clone)]
pub struct RemoteInvoker {
    transport: Arc<dyn ModelTransport>,
}

impl RemoteInvoker {
    pub fn new(transport: Arc<dyn ModelTransport>) -> Self {
        Self { transport }
    }

    /// Invoke `model_id` once and classify what came back
    pub async fn invoke(&self, model_id: &str, body: &Value) -> InvocationResult {
        let payload = match serde_json::to_vec(body) {
            Ok(payload) => payload,
            Err(e) => return InvocationResult::failed(RemoteErrorKind::Unclassified, format!("Unexpected error: {e}")),
        };

        tracing::debug!(
            transport = self.transport.name(),
            model_id,
            bytes = payload.len(),
            "invoking model"
        );

        match self.transport.invoke(model_id, payload).await {
            Ok(raw) => interpret(model_id, &raw),
            Err(error) => classify(model_id, error),
        }
    }
}

fn interpret(model_id: &str, raw: &[u8]) -> InvocationResult {
    let response: ModelResponse = match serde_json::from_slice(raw) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(model_id, error = %e, "malformed model response");
            return InvocationResult::failed(RemoteErrorKind::Unclassified, format!("Malformed model response: {e}"));
        }
    };

    if let Some(reason) = response.finish_reasons.iter().flatten().next() {
        tracing::warn!(model_id, reason = %reason, "content filtered");
        return InvocationResult::ContentFiltered { reason: reason.clone() };
    }

    if let Some(reason) = response.error.filter(|e| !e.is_empty()) {
        tracing::warn!(model_id, reason = %reason, "content filtered");
        return InvocationResult::ContentFiltered { reason };
    }

    if response.images.is_empty() {
        tracing::error!(model_id, "model returned no images");
        return InvocationResult::failed(RemoteErrorKind::Unclassified, "No images generated");
    }

    let images = match response.images.iter().map(|image| codec::decode(image)).collect::<Result<Vec<_>, _>>() {
        Ok(images) => images,
        Err(e) => {
            tracing::error!(model_id, error = %e, "model returned undecodable image data");
            return InvocationResult::failed(RemoteErrorKind::Unclassified, format!("Malformed model response: {e}"));
        }
    };

    tracing::debug!(model_id, count = response.images.len(), "model invocation succeeded");

    InvocationResult::Success(Generation {
        images,
        finish_reasons: response.finish_reasons,
    })
}

/// Map a transport failure onto the remote error taxonomy
pub fn classify(model_id: &str, error: TransportError) -> InvocationResult {
    let (code, message) = match error {
        TransportError::Service { code, message } => (code, message),
        TransportError::NoResponse(detail) => {
            tracing::warn!(model_id, detail = %detail, "no response from model");
            return InvocationResult::failed(
                RemoteErrorKind::ServiceUnavailable,
                format!("No response from the model service: {detail}"),
            );
        }
        TransportError::Other(detail) => {
            tracing::error!(model_id, detail = %detail, "unexpected transport error");
            return InvocationResult::failed(RemoteErrorKind::Unclassified, format!("Unexpected error: {detail}"));
        }
    };

    tracing::debug!(model_id, code = %code, message = %message, "model invocation failed");

    match code.as_str() {
        "ValidationException" => {
            InvocationResult::failed(RemoteErrorKind::InvalidParameters, format!("Invalid parameters: {message}"))
        }
        "AccessDeniedException" => InvocationResult::failed(
            RemoteErrorKind::AccessDenied,
            format!(
                "Access denied for model {model_id}. Check that bedrock:InvokeModel is allowed and model access is enabled."
            ),
        ),
        "ThrottlingException" => InvocationResult::failed(
            RemoteErrorKind::RateLimited,
            "Rate limit exceeded after retries. Consider requesting a quota increase if this persists.",
        ),
        "ModelNotReadyException" => InvocationResult::failed(
            RemoteErrorKind::TemporarilyNotReady,
            format!("Model {model_id} is not ready. Try again in a few moments."),
        ),
        "ServiceUnavailableException" => InvocationResult::failed(
            RemoteErrorKind::ServiceUnavailable,
            "Bedrock is temporarily unavailable.",
        ),
        "InternalServerException" => {
            InvocationResult::failed(RemoteErrorKind::InternalRemoteError, "Bedrock reported an internal error.")
        }
        _ => {
            tracing::error!(model_id, code = %code, message = %message, "unclassified model error");
            InvocationResult::failed(RemoteErrorKind::Unclassified, format!("API call failed ({code}): {message}"))
        }
    }
}
