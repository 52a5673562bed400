//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::schema::LogItConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_LOG_DIR: &str = "LOG_IT_LOG";
pub const ENV_PORT: &str = "LOG_IT_PORT";
pub const ENV_HOST: &str = "LOG_IT_HOST";
pub const ENV_AUTH: &str = "LOG_IT_AUTH";
pub const ENV_REDIRECT_TO: &str = "LOG_IT_REDIRECT_TO";
pub const ENV_DEBUG: &str = "LOG_IT_DEBUG";
pub const ENV_RATELIMIT: &str = "LOG_IT_AUTHENTICATE_RATELIMIT";
pub const ENV_MAX_BODY_BYTES: &str = "LOG_IT_MAX_BODY_BYTES";
pub const ENV_REQUEST_TIMEOUT: &str = "LOG_IT_REQUEST_TIMEOUT_SECS";
pub const ENV_METRICS: &str = "LOG_IT_METRICS";
pub const ENV_METRICS_ADDRESS: &str = "LOG_IT_METRICS_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    InvalidEnv { var: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::InvalidEnv { var, value } => {
                write!(f, "Invalid value {:?} for {}", value, var)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration.
///
/// Defaults are overlaid by the optional TOML file, then by `LOG_IT_*`
/// environment variables.
pub fn load_config(path: Option<&Path>) -> Result<LogItConfig, ConfigError> {
    let mut config = match path {
        Some(path) => from_file(path)?,
        None => LogItConfig::default(),
    };

    apply_env(&mut config, |var| std::env::var(var).ok())?;
    finalize(config)
}

/// Parse a TOML file without applying the environment or validating.
pub fn from_file(path: &Path) -> Result<LogItConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Overlay environment values onto `config`.
///
/// `lookup` resolves a variable name; empty values count as unset.
pub fn apply_env<F>(config: &mut LogItConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|v| !v.is_empty());

    if let Some(dir) = get(ENV_LOG_DIR) {
        config.log_dir = PathBuf::from(dir);
    }
    if let Some(host) = get(ENV_HOST) {
        config.bind_host = host;
    }
    if let Some(port) = get(ENV_PORT) {
        config.port = parse_env(ENV_PORT, port)?;
    }
    if let Some(auth) = get(ENV_AUTH) {
        config.auth = Some(auth);
    }
    if let Some(target) = get(ENV_REDIRECT_TO) {
        config.redirect_to = Some(target);
    }
    if let Some(debug) = get(ENV_DEBUG) {
        config.debug = parse_flag(ENV_DEBUG, debug)?;
    }
    if let Some(ms) = get(ENV_RATELIMIT) {
        config.authenticate_ratelimit_ms = parse_env(ENV_RATELIMIT, ms)?;
    }
    if let Some(bytes) = get(ENV_MAX_BODY_BYTES) {
        config.max_body_bytes = parse_env(ENV_MAX_BODY_BYTES, bytes)?;
    }
    if let Some(secs) = get(ENV_REQUEST_TIMEOUT) {
        config.request_timeout_secs = parse_env(ENV_REQUEST_TIMEOUT, secs)?;
    }
    if let Some(enabled) = get(ENV_METRICS) {
        config.metrics_enabled = parse_flag(ENV_METRICS, enabled)?;
    }
    if let Some(addr) = get(ENV_METRICS_ADDRESS) {
        config.metrics_address = addr;
    }

    Ok(())
}

/// Normalize and validate a fully assembled configuration.
pub fn finalize(mut config: LogItConfig) -> Result<LogItConfig, ConfigError> {
    if config.auth.as_deref() == Some("") {
        config.auth = None;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn parse_env<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

fn parse_flag(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv { var, value }),
    }
}
