//! Configuration schema definitions.
//!
//! Every field has a default so an empty TOML file (or no file at all) yields
//! a working appliance. Environment overrides are applied by the loader.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the logging appliance.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogItConfig {
    /// Directory holding one `<id>.json` file per recorded request.
    pub log_dir: PathBuf,

    /// Interface to listen on.
    pub bind_host: String,

    /// Port to listen on.
    pub port: u16,

    /// Shared secret for the log viewer. Unset disables authentication
    /// permanently.
    pub auth: Option<String>,

    /// Reserved redirect target. Read and carried, not used by any handler.
    pub redirect_to: Option<String>,

    /// Emit debug-level operational logs.
    pub debug: bool,

    /// Minimum interval between authentication attempts per client address.
    pub authenticate_ratelimit_ms: u64,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,

    /// Total time allowed for a request/response in seconds.
    pub request_timeout_secs: u64,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for LogItConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("log/"),
            bind_host: "0.0.0.0".to_string(),
            port: 8000,
            auth: None,
            redirect_to: None,
            debug: true,
            authenticate_ratelimit_ms: 5000,
            max_body_bytes: 100 * 1024, // 100KiB
            request_timeout_secs: 30,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

impl LogItConfig {
    /// The configured secret, if one is set and non-empty.
    pub fn secret(&self) -> Option<&str> {
        self.auth.as_deref().filter(|s| !s.is_empty())
    }

    /// Socket address the listener binds to.
    ///
    /// Only meaningful after validation, which guarantees `bind_host` parses.
    pub fn bind_address(&self) -> Option<SocketAddr> {
        let ip: IpAddr = self.bind_host.parse().ok()?;
        Some(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = LogItConfig::default();
        assert_eq!(config.log_dir, PathBuf::from("log/"));
        assert_eq!(config.port, 8000);
        assert_eq!(config.authenticate_ratelimit_ms, 5000);
        assert!(config.auth.is_none());
        assert!(config.redirect_to.is_none());
    }

    #[test]
    fn empty_secret_counts_as_unset() {
        let config = LogItConfig {
            auth: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.secret(), None);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: LogItConfig = toml::from_str("port = 9000\nauth = \"hunter2\"").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.secret(), Some("hunter2"));
        assert_eq!(config.authenticate_ratelimit_ms, 5000);
        assert_eq!(
            config.bind_address(),
            Some("0.0.0.0:9000".parse().unwrap())
        );
    }
}
