//! Local image handling for Easel
//!
//! Everything here runs before a remote call is made: resolving caller image
//! references to bytes, reading pixel dimensions, synthesizing masks, and
//! enforcing per-operation dimension limits.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod codec;
mod error;
pub mod mask;
pub mod precondition;

pub use codec::{Dimensions, ImageInfo, ImageRef};
pub use error::{ImagingError, Result};
pub use mask::{MaskShape, MaskSpec};
