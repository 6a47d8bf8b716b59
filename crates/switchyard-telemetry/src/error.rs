//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while loading logging configuration or
/// installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// TOML configuration did not parse.
    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON configuration did not parse.
    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// An environment override had an unusable value.
    #[error("Invalid environment variable {key}: {message}")]
    EnvVar {
        /// Variable name.
        key: String,
        /// What was wrong with it.
        message: String,
    },
}

impl TelemetryError {
    pub(crate) fn env_var(key: &str, message: impl Into<String>) -> Self {
        Self::EnvVar {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
