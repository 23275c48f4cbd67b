//! vox-detect - AI voice detection service
//!
//! Accepts a voice recording (URL or base64 payload) on `POST /predict` and
//! answers with an "AI Generated" / "Human" verdict, a confidence, and a
//! short explanation.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vox_common::api::key_fingerprint;
use vox_common::config::{config_file_path, load_toml_config, TomlConfig};
use vox_detect::config::{CliOverrides, ServiceConfig};
use vox_detect::services::{AcquirerConfig, AudioAcquirer, DetectionService};
use vox_detect::{build_router, AppState};

/// Command-line arguments for vox-detect
#[derive(Parser, Debug)]
#[command(name = "vox-detect")]
#[command(about = "AI-generated voice detection service")]
#[command(version)]
struct Args {
    /// TOML config file (default: ~/.config/vox/vox-detect.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Key required in the x-api-key header
    #[arg(long)]
    api_key: Option<String>,

    /// Remote download timeout in seconds
    #[arg(long)]
    fetch_timeout_secs: Option<u64>,

    /// Largest accepted request body in bytes
    #[arg(long)]
    max_body_bytes: Option<usize>,

    /// Directory for per-request scratch audio files
    #[arg(long)]
    scratch_dir: Option<PathBuf>,
}

fn load_config_file(explicit: Option<&PathBuf>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => Some(path.clone()),
        None => config_file_path("vox-detect"),
    };

    match path {
        Some(path) => Ok(load_toml_config(&path)?),
        None => Ok(TomlConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing starts so the TOML log level can apply
    let toml_config = load_config_file(args.config.as_ref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&toml_config.logging.level)),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting vox-detect v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = CliOverrides {
        host: args.host,
        port: args.port,
        api_key: args.api_key,
        fetch_timeout_secs: args.fetch_timeout_secs,
        max_body_bytes: args.max_body_bytes,
        scratch_dir: args.scratch_dir,
    };
    let config = ServiceConfig::resolve(cli, &toml_config)?;
    config
        .ensure_scratch_dir()
        .context("Failed to create scratch directory")?;

    info!("API key fingerprint: {}", key_fingerprint(&config.api_key));

    let acquirer = AudioAcquirer::new(AcquirerConfig {
        fetch_timeout: config.fetch_timeout,
        scratch_dir: config.scratch_dir.clone(),
        max_download_bytes: config.max_body_bytes,
    })?;
    let state = AppState::new(
        DetectionService::new(acquirer),
        config.api_key.as_str(),
        config.max_body_bytes,
    );

    let app = build_router(state);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_address))?;
    info!("Listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
