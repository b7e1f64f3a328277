use easel_imaging::ImagingError;
use strum::{Display, IntoStaticStr};
use thiserror::Error;

use crate::schema::ValidationError;

pub type Result<T> = std::result::Result<T, ImageGenError>;

/// How a failed remote invocation was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum RemoteErrorKind {
    /// The remote validator rejected the request
    InvalidParameters,
    AccessDenied,
    RateLimited,
    ServiceUnavailable,
    TemporarilyNotReady,
    InternalRemoteError,
    /// Anything the classifier does not recognize
    Unclassified,
}

impl RemoteErrorKind {
    /// Whether a later attempt could succeed without changing the request
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServiceUnavailable | Self::TemporarilyNotReady | Self::InternalRemoteError
        )
    }

    /// Stable tag surfaced in response metadata
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Failure of one image operation
#[derive(Debug, Error)]
pub enum ImageGenError {
    /// Caller arguments broke one or more field constraints
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An input image failed to decode or a precondition check
    #[error(transparent)]
    Imaging(#[from] ImagingError),

    /// The remote call failed, after any retries the transport made
    #[error("{message}")]
    Remote { kind: RemoteErrorKind, message: String },

    /// The remote produced a response but declined to generate content
    #[error("Content filtered by the model: {reason}")]
    ContentFiltered { reason: String },

    /// Generated images could not be written locally
    #[error("Failed to save generated images: {0}")]
    Storage(#[source] std::io::Error),
}

impl ImageGenError {
    pub(crate) fn remote(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self::Remote {
            kind,
            message: message.into(),
        }
    }

    /// Stable snake_case tag for callers to branch on
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Imaging(e) => e.kind(),
            Self::Remote { kind, .. } => kind.as_str(),
            Self::ContentFiltered { .. } => "content_filtered",
            Self::Storage(_) => "storage_error",
        }
    }

    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Remote { kind, .. } => kind.is_retryable(),
            _ => false,
        }
    }
}
