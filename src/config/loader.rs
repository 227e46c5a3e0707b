//! Configuration loading from disk and the environment.
//!
//! The gateway starts from built-in defaults, optionally merges a TOML file,
//! then applies environment variable overrides. Validation runs last so a
//! bad override aborts startup the same way a bad file does.

use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate the gateway configuration.
///
/// `path` points at an optional TOML file; when `None`, defaults plus
/// environment overrides apply.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(p) => toml::from_str(&std::fs::read_to_string(p)?)?,
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment variable overrides. `lookup` is injected so the
/// override logic stays a pure function.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("AUTH_SERVICE_URL") {
        config.upstreams.auth_service_url = v;
    }
    if let Some(v) = lookup("USER_SERVICE_URL") {
        config.upstreams.user_service_url = v;
    }
    if let Some(v) = lookup("TICKET_SERVICE_URL") {
        config.upstreams.ticket_service_url = v;
    }
    if let Some(v) = lookup("COMMENT_SERVICE_URL") {
        config.upstreams.comment_service_url = v;
    }
    if let Some(v) = lookup("JWT_SECRET") {
        config.auth.jwt_secret = v;
    }
    if let Some(v) = lookup("LISTEN_ADDR") {
        config.listener.bind_address = normalize_listen_addr(&v);
    }
}

/// Accept the bare ":8080" form alongside a full "host:port".
fn normalize_listen_addr(addr: &str) -> String {
    if let Some(port) = addr.strip_prefix(':') {
        format!("0.0.0.0:{}", port)
    } else {
        addr.to_string()
    }
}
