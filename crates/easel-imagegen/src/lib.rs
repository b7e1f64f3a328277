#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Bedrock image operations
//!
//! Seventeen remote operations share one pipeline: validate arguments against
//! a field table, check image inputs, build the provider's wire body, invoke
//! the model once, then save the returned images. [`ImageService`] runs that
//! pipeline and always answers with an [`OperationResponse`].

mod error;
pub mod invoker;
mod mask_tool;
mod operation;
pub mod precondition;
pub mod request;
pub mod schema;
mod service;
pub mod store;
pub mod transport;
mod types;

pub use error::{ImageGenError, RemoteErrorKind, Result};
pub use invoker::{Generation, InvocationResult, RemoteInvoker};
pub use mask_tool::MaskTool;
pub use operation::Operation;
pub use schema::{FieldKind, FieldSpec, OperationParams, ValidationError, Violation};
pub use service::{ImageService, OutputTarget};
pub use transport::{BedrockTransport, ModelTransport, TransportError};
pub use types::{AspectRatio, OperationResponse, OutputFormat, Quality, Status, StylePreset};
