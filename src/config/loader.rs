//! Configuration loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming the service config file.
pub const CONFIG_PATH_ENV: &str = "ACTIONS_CONFIG";

/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid PORT value '{0}'")]
    Port(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServiceConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Resolve the effective configuration from the process environment.
///
/// Reads the file named by `ACTIONS_CONFIG` when set, otherwise starts from
/// defaults, then applies the `PORT` override.
pub fn load_from_env() -> Result<ServiceConfig, ConfigError> {
    let config = match env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => load_config(Path::new(&path))?,
        _ => ServiceConfig::default(),
    };

    apply_port_override(config, env::var(PORT_ENV).ok().as_deref())
}

/// Apply a `PORT` value on top of a loaded configuration.
pub fn apply_port_override(
    mut config: ServiceConfig,
    port: Option<&str>,
) -> Result<ServiceConfig, ConfigError> {
    if let Some(raw) = port.map(str::trim).filter(|p| !p.is_empty()) {
        config.listener.port = raw
            .parse::<u16>()
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| ConfigError::Port(raw.to_string()))?;
    }

    Ok(config)
}
