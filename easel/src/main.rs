#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use args::Args;
use clap::Parser;
use easel_config::Config;
use easel_imagegen::ImageService;
use easel_mcp::EaselServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env(),
    };
    if let Some(workspace) = args.workspace_dir {
        config.output.workspace_dir = Some(workspace);
    }

    // Logs go to stderr; stdout is the MCP channel
    let _telemetry_guard = easel_telemetry::init(config.telemetry.as_ref(), &args.log_filter)?;

    tracing::info!(
        config = ?args.config,
        region = %config.bedrock.region,
        "starting easel"
    );

    let service = ImageService::from_config(&config).await;

    easel_mcp::serve_stdio(EaselServer::new(service), shutdown_signal()).await?;

    tracing::info!("easel stopped");
    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
///
/// A handler that cannot be installed never fires; the server then runs until
/// the client disconnects.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
