//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Check that upstream addresses are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("listener.max_in_flight must be greater than zero")]
    MaxInFlight,

    #[error("auth.secret must not be empty")]
    EmptySecret,

    #[error("backends.{name} '{value}' is not a valid http(s) URL")]
    BackendUrl { name: &'static str, value: String },

    #[error("backends.users '{0}' must be a host:port authority")]
    UsersAuthority(String),

    #[error("timeouts.{0} must be greater than zero")]
    Timeout(&'static str),

    #[error("limits.max_body_bytes must be greater than zero")]
    BodyLimit,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.listener.max_in_flight == 0 {
        errors.push(ValidationError::MaxInFlight);
    }

    if config.auth.secret.is_empty() {
        errors.push(ValidationError::EmptySecret);
    }

    for (name, value) in [
        ("posts", &config.backends.posts),
        ("statistic", &config.backends.statistic),
    ] {
        let valid = url::Url::parse(value)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::BackendUrl {
                name,
                value: value.clone(),
            });
        }
    }

    if config.backends.users.parse::<axum::http::uri::Authority>().is_err() {
        errors.push(ValidationError::UsersAuthority(config.backends.users.clone()));
    }

    for (name, secs) in [
        ("connect_secs", config.timeouts.connect_secs),
        ("backend_secs", config.timeouts.backend_secs),
        ("shutdown_secs", config.timeouts.shutdown_secs),
    ] {
        if secs == 0 {
            errors.push(ValidationError::Timeout(name));
        }
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::BodyLimit);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
