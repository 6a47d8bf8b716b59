//! Structured logging for Switchyard services.
//!
//! Switchyard crates only emit `tracing` events; installing a subscriber is
//! the application's job. This crate provides the usual one:
//!
//! - [`LogConfig`]: level, format and field toggles, loadable from TOML,
//!   JSON and `SWITCHYARD_LOG__*` environment variables
//! - [`init_logging`]: a `tracing-subscriber` registry with an `EnvFilter`
//!   and a JSON or pretty fmt layer
//!
//! # Example
//!
//! ```rust,no_run
//! use switchyard_telemetry::{init_logging, LogConfig};
//!
//! let mut config = LogConfig::from_toml_str(r#"level = "switchyard=debug,info""#)?;
//! config.apply_env_overrides()?;
//! init_logging(&config)?;
//! # Ok::<(), switchyard_telemetry::TelemetryError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/switchyard-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod logging;

pub use config::{LogConfig, LogFormat, ENV_PREFIX};
pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging};
