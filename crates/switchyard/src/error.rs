//! Configuration errors raised by [`RouterBuilder::finalize`](crate::RouterBuilder::finalize).

use switchyard_router::RouteError;
use thiserror::Error;

/// A route setup mistake detected while finalizing.
///
/// Finalize stops at the first one; no handler is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A direct pattern was malformed or collided with an earlier registration.
    #[error("cannot register pattern {pattern:?}: {source}")]
    Pattern {
        /// The pattern as passed to `handle`.
        pattern: String,
        /// What the matcher rejected.
        #[source]
        source: RouteError,
    },

    /// A mount prefix is not a plain path.
    #[error("invalid mount prefix {prefix:?}: {reason}")]
    MountPrefix {
        /// The prefix as passed to `mount`.
        prefix: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A mount prefix collided with an earlier registration.
    #[error("cannot mount at {prefix:?}: {source}")]
    Mount {
        /// The prefix as passed to `mount`.
        prefix: String,
        /// What the matcher rejected.
        #[source]
        source: RouteError,
    },
}

impl ConfigError {
    /// The pattern or prefix the error is about.
    pub fn route(&self) -> &str {
        match self {
            Self::Pattern { pattern, .. } => pattern,
            Self::MountPrefix { prefix, .. } | Self::Mount { prefix, .. } => prefix,
        }
    }
}
