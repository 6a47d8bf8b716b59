//! Server configuration.
//!
//! # Example
//!
//! ```rust
//! use switchyard_server::ServerConfig;
//! use std::time::Duration;
//!
//! let config = ServerConfig::builder()
//!     .http_addr("127.0.0.1:3000")
//!     .shutdown_timeout(Duration::from_secs(5))
//!     .build();
//!
//! assert_eq!(config.http_addr(), "127.0.0.1:3000");
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

/// Bind address used when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Seconds to let open connections finish after shutdown.
pub const DEFAULT_DRAIN_SECS: u64 = 30;

/// Where to listen and how long to drain on shutdown.
///
/// Deserializes from `{ http_addr = "...", shutdown_timeout_secs = N }`;
/// both keys are optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    http_addr: String,
    shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Starts a builder with default values.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// The configured bind address.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Parses the bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.http_addr.parse()
    }

    /// How long to wait for open connections after shutdown is triggered.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Chainable construction of a [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    http_addr: String,
    shutdown_timeout: Duration,
}

impl ServerConfigBuilder {
    /// Creates a builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http_addr: DEFAULT_BIND_ADDR.to_string(),
            shutdown_timeout: Duration::from_secs(DEFAULT_DRAIN_SECS),
        }
    }

    /// Sets the bind address (e.g. `"127.0.0.1:3000"`).
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = addr.into();
        self
    }

    /// Sets the drain timeout. Sub-second parts are dropped.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Builds the [`ServerConfig`].
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            http_addr: self.http_addr,
            shutdown_timeout_secs: self.shutdown_timeout.as_secs(),
        }
    }
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr(), DEFAULT_BIND_ADDR);
        assert_eq!(
            config.shutdown_timeout(),
            Duration::from_secs(DEFAULT_DRAIN_SECS)
        );
    }

    #[test]
    fn test_builder() {
        let config = ServerConfig::builder()
            .http_addr("127.0.0.1:9000")
            .shutdown_timeout(Duration::from_secs(2))
            .build();

        assert_eq!(config.socket_addr().unwrap().port(), 9000);
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_socket_addr() {
        let config = ServerConfig::builder().http_addr("localhost").build();
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: ServerConfig = toml::from_str(r#"http_addr = "127.0.0.1:3000""#).unwrap();
        assert_eq!(config.http_addr(), "127.0.0.1:3000");
        assert_eq!(
            config.shutdown_timeout(),
            Duration::from_secs(DEFAULT_DRAIN_SECS)
        );
    }

    #[test]
    fn test_deserialize_json_rejects_unknown() {
        let result: Result<ServerConfig, _> =
            serde_json::from_str(r#"{"http2_enabled": true}"#);
        assert!(result.is_err());
    }
}
