//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use secrecy::Secret;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable carrying the upstream credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the upstream model.
pub const MODEL_ENV: &str = "GEMINI_MODEL";
/// Environment variable overriding the listener bind address.
pub const BIND_ENV: &str = "RELAY_BIND";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file, overlay the process
/// environment, then validate.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => RelayConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment values onto a config.
///
/// Empty values are ignored, so an unset secret in the host environment does
/// not wipe a key that came from the file.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = lookup(API_KEY_ENV) {
        config.upstream.api_key = Some(Secret::new(key));
    }
    if let Some(model) = lookup(MODEL_ENV) {
        config.upstream.model = model;
    }
    if let Some(bind) = lookup(BIND_ENV) {
        config.listener.bind_address = bind;
    }
}
