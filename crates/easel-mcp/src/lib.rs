#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! MCP tool surface for the image operations

mod server;
pub mod tools;

pub use server::{EaselServer, serve_stdio};
pub use tools::ToolKind;
