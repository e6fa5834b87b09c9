//! melody-ai - Mood inference service
//!
//! Serves the face, text, speech and lyrics mood adapters over HTTP.
//! Configuration resolves environment → TOML file → defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use melody_common::EngineConfig;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use melody_ai::AppState;

/// Command-line arguments for melody-ai
#[derive(Parser, Debug)]
#[command(name = "melody-ai")]
#[command(about = "Mood inference service for MelodyMind")]
#[command(version)]
struct Args {
    /// TOML config file (defaults to <config_dir>/melodymind/melody-ai.toml)
    #[arg(short, long, env = "MELODY_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address, overrides MELODY_HOST and the config file
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides MELODY_PORT and the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = EngineConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("melody_ai={0},melody_common={0},tower_http=info", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting melody-ai v{}", env!("CARGO_PKG_VERSION"));
    config.log_demotions();

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::from_config(config).context("Failed to build mood engine")?;
    let app = melody_ai::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

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
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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
