use std::path::PathBuf;

use clap::Parser;

/// Easel image tools
#[derive(Debug, Parser)]
#[command(name = "easel", about = "MCP server for Amazon Bedrock image generation and editing")]
pub struct Args {
    /// Path to configuration file; AWS environment defaults apply without one
    #[arg(short, long, env = "EASEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter directive, written to stderr
    #[arg(long, default_value = "info", env = "EASEL_LOG")]
    pub log_filter: String,

    /// Default workspace root for saved images
    #[arg(long, env = "EASEL_WORKSPACE_DIR")]
    pub workspace_dir: Option<PathBuf>,
}
