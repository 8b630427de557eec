//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables that override file settings, applied after parsing.
const ENV_BIND_ADDRESS: &str = "GATEWAY_BIND_ADDRESS";
const ENV_JWT_SECRET: &str = "GATEWAY_JWT_SECRET";
const ENV_POSTS_ADDR: &str = "POSTS_SERVICE_ADDR";
const ENV_STATISTIC_ADDR: &str = "STATISTIC_SERVICE_ADDR";
const ENV_USERS_ADDR: &str = "USERS_SERVICE_ADDR";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides, and validate the result.
///
/// Without a file the built-in defaults are used as the base.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply deployment overrides from a key lookup (the process environment in
/// production).
pub fn apply_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let targets: [(&str, &mut String); 5] = [
        (ENV_BIND_ADDRESS, &mut config.listener.bind_address),
        (ENV_JWT_SECRET, &mut config.auth.secret),
        (ENV_POSTS_ADDR, &mut config.backends.posts),
        (ENV_STATISTIC_ADDR, &mut config.backends.statistic),
        (ENV_USERS_ADDR, &mut config.backends.users),
    ];

    for (key, slot) in targets {
        if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
            tracing::debug!(key, "Applying environment override");
            *slot = value;
        }
    }
}
