//! Server configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.

use serde::{Deserialize, Serialize};

use crate::error::{DasError, DasResult};
use crate::observability::Severity;

/// DAS server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 50051)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Rows per emitted batch unless an instance overrides it (default: 5)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Batches buffered between a running stream and its client (default: 4)
    #[serde(default = "default_stream_buffer")]
    pub stream_buffer: usize,

    /// Minimum log severity: trace, info, warn or error (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    50051
}

fn default_batch_size() -> usize {
    5
}

fn default_stream_buffer() -> usize {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            batch_size: default_batch_size(),
            stream_buffer: default_stream_buffer(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Create a default config listening on `port`
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> DasResult<Severity> {
        self.log_level.parse::<Severity>().map_err(|_| {
            DasError::InvalidArgument(format!("unknown log_level '{}'", self.log_level))
        })
    }

    pub fn validate(&self) -> DasResult<()> {
        if self.host.trim().is_empty() {
            return Err(DasError::InvalidArgument("host must not be empty".into()));
        }
        if self.batch_size == 0 {
            return Err(DasError::InvalidArgument("batch_size must be > 0".into()));
        }
        if self.stream_buffer == 0 {
            return Err(DasError::InvalidArgument("stream_buffer must be > 0".into()));
        }
        self.severity()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 50051);
        assert_eq!(config.batch_size, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig::with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: ServerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_sizes_and_bad_level() {
        let config = ServerConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            log_level: "loud".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
