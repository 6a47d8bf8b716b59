//! Builder-side accumulation of patterns and mounts.
//!
//! Adding to a table only records the entry. Nothing is parsed or checked
//! until the tables are registered into a fresh matcher at finalize time,
//! in insertion order.

use switchyard_core::BoxedHandler;
use switchyard_router::Router as Routes;
use tracing::debug;

use crate::error::ConfigError;
use crate::mount;

/// `(pattern, handler)` pairs in insertion order.
#[derive(Clone, Default)]
pub(crate) struct PatternTable {
    entries: Vec<(String, BoxedHandler)>,
}

impl PatternTable {
    pub(crate) fn push(&mut self, pattern: String, handler: BoxedHandler) {
        self.entries.push((pattern, handler));
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Registers every entry, stopping at the first rejected pattern.
    pub(crate) fn register(self, routes: &mut Routes<BoxedHandler>) -> Result<(), ConfigError> {
        for (pattern, handler) in self.entries {
            if let Err(source) = routes.insert(&pattern, handler) {
                return Err(ConfigError::Pattern { pattern, source });
            }
            debug!(pattern = %pattern, "Registered pattern");
        }
        Ok(())
    }
}

/// `(prefix, handler)` pairs in insertion order.
#[derive(Clone, Default)]
pub(crate) struct MountTable {
    entries: Vec<(String, BoxedHandler)>,
}

impl MountTable {
    pub(crate) fn push(&mut self, prefix: String, handler: BoxedHandler) {
        self.entries.push((prefix, handler));
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Registers a prefix-stripping adapter for every entry.
    pub(crate) fn register(self, routes: &mut Routes<BoxedHandler>) -> Result<(), ConfigError> {
        for (prefix, handler) in self.entries {
            mount::register(routes, prefix, handler)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode};
    use switchyard_core::{boxed, handler_fn, Response, ResponseExt};
    use switchyard_router::RouteError;

    fn ok() -> BoxedHandler {
        boxed(handler_fn(|_| async { Response::empty(StatusCode::OK) }))
    }

    #[test]
    fn test_push_does_not_validate() {
        let mut table = PatternTable::default();
        table.push("not a pattern".to_string(), ok());
        table.push("/ok".to_string(), ok());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_register_in_insertion_order() {
        let mut table = PatternTable::default();
        table.push("GET /b".to_string(), ok());
        table.push("GET /a".to_string(), ok());

        let mut routes = Routes::new();
        table.register(&mut routes).unwrap();
        assert_eq!(routes.patterns().collect::<Vec<_>>(), vec!["GET /b", "GET /a"]);
    }

    #[test]
    fn test_register_reports_first_failure() {
        let mut table = PatternTable::default();
        table.push("GET /users".to_string(), ok());
        table.push("GET /users".to_string(), ok());
        table.push("broken".to_string(), ok());

        let mut routes = Routes::new();
        let err = table.register(&mut routes).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Pattern {
                pattern: "GET /users".to_string(),
                source: RouteError::Duplicate {
                    route: "GET /users".to_string()
                }
            }
        );
    }

    #[test]
    fn test_mount_collides_with_subtree_pattern() {
        let mut patterns = PatternTable::default();
        patterns.push("/api/".to_string(), ok());
        let mut mounts = MountTable::default();
        mounts.push("/api/".to_string(), ok());
        assert_eq!(mounts.len(), 1);

        let mut routes = Routes::new();
        patterns.register(&mut routes).unwrap();
        let err = mounts.register(&mut routes).unwrap_err();
        assert!(matches!(err, ConfigError::Mount { ref prefix, .. } if prefix == "/api/"));
    }

    #[test]
    fn test_mount_registers_subtree() {
        let mut mounts = MountTable::default();
        mounts.push("/static".to_string(), ok());

        let mut routes = Routes::new();
        mounts.register(&mut routes).unwrap();
        assert!(routes.at(&Method::DELETE, "/static/css/site.css").is_ok());
        assert!(routes.at(&Method::GET, "/static").is_ok());
    }
}
