//! Logging configuration.
//!
//! Values come from, in increasing priority: defaults or a preset, a TOML or
//! JSON document, then `SWITCHYARD_LOG__*` environment variables.
//!
//! | Variable                   | Field              | Values                  |
//! |----------------------------|--------------------|-------------------------|
//! | `SWITCHYARD_LOG__LEVEL`    | `level`            | any `EnvFilter` string  |
//! | `SWITCHYARD_LOG__FORMAT`   | `format`           | `json`, `pretty`        |
//! | `SWITCHYARD_LOG__ENABLED`  | `enabled`          | `true`/`false`, `1`/`0` |
//! | `SWITCHYARD_LOG__LOCATION` | `include_location` | as above                |
//! | `SWITCHYARD_LOG__TARGET`   | `include_target`   | as above                |

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::TelemetryError;

/// Prefix of the environment variables read by [`LogConfig::apply_env_overrides`].
pub const ENV_PREFIX: &str = "SWITCHYARD_LOG";

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Install a subscriber at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directives (e.g. `"info"`, `"switchyard=debug,hyper=warn"`).
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line in events.
    #[serde(default)]
    pub include_location: bool,

    /// Include the event target (module path).
    #[serde(default = "default_true")]
    pub include_target: bool,
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Human-readable output at DEBUG with source locations.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            include_target: true,
        }
    }

    /// JSON output at INFO.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: default_level(),
            format: LogFormat::Json,
            include_location: false,
            include_target: true,
        }
    }

    /// Parses a TOML document; missing fields take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, TelemetryError> {
        Ok(toml::from_str(source)?)
    }

    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json_str(source: &str) -> Result<Self, TelemetryError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, TelemetryError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Applies every `SWITCHYARD_LOG__*` variable in the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), TelemetryError> {
        let prefix = format!("{ENV_PREFIX}__");
        for (key, value) in env::vars().filter(|(k, _)| k.starts_with(&prefix)) {
            self.apply_env_var(&key, &value)?;
        }
        Ok(())
    }

    /// Applies a single override.
    pub fn apply_env_var(&mut self, key: &str, value: &str) -> Result<(), TelemetryError> {
        let field = key
            .strip_prefix(ENV_PREFIX)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| TelemetryError::env_var(key, "invalid key format"))?;

        match field {
            "LEVEL" => self.level = value.to_string(),
            "FORMAT" => {
                self.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => return Err(TelemetryError::env_var(key, "expected 'json' or 'pretty'")),
                };
            }
            "ENABLED" => self.enabled = parse_bool(key, value)?,
            "LOCATION" => self.include_location = parse_bool(key, value)?,
            "TARGET" => self.include_target = parse_bool(key, value)?,
            _ => return Err(TelemetryError::env_var(key, "unknown setting")),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, TelemetryError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(TelemetryError::env_var(key, "expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_production() {
        let config = LogConfig::default();
        assert!(config.enabled);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config, LogConfig::production());
    }

    #[test]
    fn test_development_config() {
        let config = LogConfig::development();
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.include_location);
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_from_toml_partial() {
        let config = LogConfig::from_toml_str(
            r#"
            level = "switchyard=debug,warn"
            format = "pretty"
            "#,
        )
        .unwrap();

        assert_eq!(config.level, "switchyard=debug,warn");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.enabled);
        assert!(config.include_target);
    }

    #[test]
    fn test_from_toml_rejects_unknown_field() {
        let result = LogConfig::from_toml_str("colour = true");
        assert!(matches!(result, Err(TelemetryError::Toml(_))));
    }

    #[test]
    fn test_from_json() {
        let config = LogConfig::from_json_str(r#"{"enabled": false}"#).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_log_format_deserialize() {
        let format: LogFormat = serde_json::from_str(r#""pretty""#).unwrap();
        assert_eq!(format, LogFormat::Pretty);
    }

    #[test]
    fn test_apply_env_var() {
        let mut config = LogConfig::default();
        config.apply_env_var("SWITCHYARD_LOG__LEVEL", "trace").unwrap();
        config.apply_env_var("SWITCHYARD_LOG__FORMAT", "Pretty").unwrap();
        config.apply_env_var("SWITCHYARD_LOG__ENABLED", "off").unwrap();
        config.apply_env_var("SWITCHYARD_LOG__LOCATION", "1").unwrap();

        assert_eq!(config.level, "trace");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(!config.enabled);
        assert!(config.include_location);
    }

    #[test]
    fn test_apply_env_var_errors() {
        let mut config = LogConfig::default();
        for (key, value) in [
            ("SWITCHYARD_LOG__FORMAT", "xml"),
            ("SWITCHYARD_LOG__ENABLED", "maybe"),
            ("SWITCHYARD_LOG__COLOUR", "true"),
            ("SWITCHYARD_LOGLEVEL", "info"),
        ] {
            assert!(
                matches!(config.apply_env_var(key, value), Err(TelemetryError::EnvVar { .. })),
                "{key}={value} should be rejected"
            );
        }
        assert_eq!(config, LogConfig::default());
    }
}
