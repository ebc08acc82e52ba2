//! Provider gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────────────┐
//!                      │                   PROVIDER GATEWAY                    │
//!   Client Request     │  ┌──────────┐   ┌──────────┐   ┌──────────────────┐   │
//!   ───────────────────┼─▶│   http   │──▶│ handlers │──▶│ providers (D&B,  │   │
//!                      │  │  server  │   │  / admin │   │  Bridger, mocks) │   │
//!                      │  └──────────┘   └──────────┘   └────────┬─────────┘   │
//!                      │                                         │             │
//!                      │                 ┌───────────────────────┼──────────┐  │
//!                      │                 │ resilience            ▼          │  │
//!                      │                 │ ResilientExecutor ──▶ session    │──┼──▶ Upstream
//!                      │                 │ (retry/backoff)   (credential)   │  │
//!                      │                 └──────────────────────────────────┘  │
//!   Client Response    │  ┌──────────┐   ┌──────────────────────────────────┐  │
//!   ◀──────────────────┼──│ response │◀──│ screening (score → risk tier)    │  │
//!                      │  └──────────┘   └──────────────────────────────────┘  │
//!                      │                                                       │
//!                      │  config · observability · lifecycle (cross-cutting)   │
//!                      └───────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use provider_gateway::config::{load_or_default, schema::PLACEHOLDER_ADMIN_KEY};
use provider_gateway::lifecycle::{signals, Shutdown};
use provider_gateway::observability::{logging, metrics};
use provider_gateway::{AppState, HttpServer};

#[derive(Parser)]
#[command(name = "provider-gateway")]
#[command(about = "REST gateway for company registry and sanctions screening providers", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "provider-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.listener.request_timeout_secs,
        token_lifetime_secs = config.session.token_lifetime_secs,
        max_retries = config.retries.max_retries,
        "Configuration loaded"
    );

    if config.admin.enabled && config.admin.api_key == PLACEHOLDER_ADMIN_KEY {
        tracing::warn!("Admin API is using the placeholder key; set admin.api_key");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    tokio::spawn(signals::trigger_on_signal(shutdown.clone()));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let state = AppState::from_config(config, &shutdown)?;
    HttpServer::new(state).run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
