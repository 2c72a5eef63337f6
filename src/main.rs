//! Dials Simulator
//!
//! A tiny remote toggle built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                ┌──────────────────────────────────────────────────────┐
//!                │                       DIALER                         │
//!   Request      │  ┌─────────┐    ┌──────────┐    ┌──────────────────┐ │
//!   ─────────────┼─▶│  http   │───▶│ handlers │───▶│   ToggleState    │ │
//!                │  │ server  │    └────┬─────┘    │ value + recency  │ │
//!                │  └─────────┘         │          └───┬──────────┬───┘ │
//!   Response     │  ┌─────────┐         │              │          │     │
//!   ◀────────────┼──│  page   │◀────────┘     ┌────────▼───┐ ┌────▼───┐ │
//!                │  │ render  │               │ countdown  │ │ store  │─┼──▶ dials.json
//!                │  └─────────┘               │ (100ms)    │ └────────┘ │
//!                │                            └────────────┘            │
//!                │  config · lifecycle · observability                  │
//!                └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use dialer::config::load_config;
use dialer::lifecycle::{open_state, Shutdown};
use dialer::observability::{logging, metrics};
use dialer::DialServer;

#[derive(Parser)]
#[command(name = "dialer")]
#[command(about = "Serve a single remotely toggleable setting", long_about = None)]
struct Cli {
    /// Path to the JSON or TOML configuration file
    #[arg(long, default_value = "./config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging("info");
            tracing::error!(path = %cli.config.display(), error = %e, "Failed to load configuration");
            return Ok(ExitCode::FAILURE);
        }
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("dialer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        path = %config.path,
        key = %config.key,
        uri = %config.uri,
        port = config.port,
        "Configuration loaded"
    );

    let toggle = match open_state(&config) {
        Ok(toggle) => toggle,
        Err(e) => {
            tracing::error!(error = %e, "Settings document is unusable");
            return Ok(ExitCode::FAILURE);
        }
    };

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.bind_address()).await?;

    let shutdown = Arc::new(Shutdown::new());
    let server = DialServer::new(config, toggle, shutdown.clone());
    server.run(listener).await?;

    if shutdown.is_fatal() {
        tracing::error!("Stopped after a fatal settings document error");
        return Ok(ExitCode::FAILURE);
    }

    tracing::info!("Shutdown complete");
    Ok(ExitCode::SUCCESS)
}
