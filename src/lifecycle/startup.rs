//! Startup orchestration.
//!
//! # Responsibilities
//! - Open lazily connected channels to the gRPC backends
//! - Bind the public listener
//! - Report every failure as a typed [`StartupError`]
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Backends connect lazily, so a backend that is down at boot does not
//!   block the gateway; its calls fail with 500 until it comes up
//! - The listener binds last (traffic only when ready)

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::backend::grpc::connect_lazy;
use crate::backend::{Backends, GrpcPostsClient, GrpcStatisticClient};
use crate::config::{ConfigError, GatewayConfig, ListenerConfig};
use crate::routing::TableError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("backend {name} at {address} is not usable: {source}")]
    Backend {
        name: &'static str,
        address: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("invalid users service address {address}: {source}")]
    ProxyTarget {
        address: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Build the posts and statistic clients from configuration.
///
/// Must run inside a Tokio runtime.
pub fn connect_backends(config: &GatewayConfig) -> Result<Backends, StartupError> {
    let posts = connect_lazy(&config.backends.posts, &config.timeouts).map_err(|source| StartupError::Backend {
        name: "posts",
        address: config.backends.posts.clone(),
        source,
    })?;
    let statistic =
        connect_lazy(&config.backends.statistic, &config.timeouts).map_err(|source| StartupError::Backend {
            name: "statistic",
            address: config.backends.statistic.clone(),
            source,
        })?;

    Ok(Backends::new(
        Arc::new(GrpcPostsClient::new(posts)),
        Arc::new(GrpcStatisticClient::new(statistic)),
    ))
}

pub async fn bind(listener: &ListenerConfig) -> Result<TcpListener, StartupError> {
    let socket = TcpListener::bind(&listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: listener.bind_address.clone(),
            source,
        })?;

    if let Ok(addr) = socket.local_addr() {
        tracing::info!(address = %addr, "Listening for connections");
    }
    Ok(socket)
}
