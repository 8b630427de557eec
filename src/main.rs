//! Social Gateway
//!
//! Front door for the social-content platform.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                   GATEWAY                         │
//!   Client Request       │  ┌────────┐   ┌──────────┐   ┌────────────────┐  │
//!   ─────────────────────┼─▶│ axum + │──▶│ endpoint │──▶│  interceptor   │  │
//!                        │  │ tower  │   │  table   │   │     chain      │  │
//!                        │  └────────┘   └──────────┘   └───────┬────────┘  │
//!                        │                                      │           │
//!                        │           ┌──────────────────────────┼─────┐     │
//!                        │           ▼                          ▼     │     │
//!                        │   ┌──────────────┐          ┌──────────────┴┐    │
//!                        │   │   handlers   │          │ reverse proxy │────┼──▶ users (HTTP)
//!                        │   └──────┬───────┘          └───────────────┘    │
//!                        │          ▼                                       │
//!                        │   ┌──────────────┐                               │
//!                        │   │ tonic client │───────────────────────────────┼──▶ posts / statistic (gRPC)
//!                        │   └──────────────┘                               │
//!                        └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use social_gateway::config::load_config;
use social_gateway::lifecycle::{startup, wait_for_signal, Shutdown};
use social_gateway::observability::{logging, metrics};
use social_gateway::GatewayServer;

#[derive(Debug, Parser)]
#[command(name = "social-gateway", version, about = "HTTP/JSON gateway for the social platform")]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        posts = %config.backends.posts,
        statistic = %config.backends.statistic,
        users = %config.backends.users,
        "social-gateway starting"
    );

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

    let backends = startup::connect_backends(&config)?;
    let server = GatewayServer::new(&config, backends)?;
    let listener = startup::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
