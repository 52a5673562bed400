//! log-it
//!
//! Records every request to `/` as `<id>.json` and answers 404. Recorded
//! requests are browsable at `/logs` after authenticating at `/auth`.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────────────────────────────────────────┐
//!     ────────────────────┼─▶ axum router                                │
//!                         │     /              → recorder ──▶ LogStore ──┼──▶ log/<id>.json
//!                         │     /auth          → form          ▲         │
//!                         │     /authenticate  → AuthGate      │         │
//!                         │     /logs          → session check → viewer  │
//!                         │                                              │
//!                         │  config · lifecycle · observability          │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use log_it::config::load_config;
use log_it::http::HttpServer;
use log_it::lifecycle::{startup, Shutdown};
use log_it::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "log-it")]
#[command(about = "Record every inbound HTTP request and browse them behind a shared secret", long_about = None)]
struct Cli {
    /// Optional TOML config file; LOG_IT_* environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    logging::init_logging(config.debug);

    tracing::info!(
        log_dir = %config.log_dir.display(),
        port = config.port,
        ratelimit_ms = config.authenticate_ratelimit_ms,
        debug = config.debug,
        "Configuration loaded"
    );
    if let Some(target) = &config.redirect_to {
        tracing::debug!(redirect_to = %target, "redirect_to is reserved and currently unused");
    }

    // Every existing record is loaded before the listener is bound.
    let store = startup::load_store(&config).await?;
    let listener = startup::bind_listener(&config).await?;

    if config.metrics_enabled {
        if let Ok(addr) = config.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    tracing::info!(
        "Listening on port {}, logging to {}, auth {}",
        config.port,
        config.log_dir.display(),
        if config.secret().is_some() { "is set" } else { "is not set" }
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(&config, store);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
