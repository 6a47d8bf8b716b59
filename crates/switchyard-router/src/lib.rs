//! Radix tree pattern matcher for Switchyard.
//!
//! This crate is the substrate the composition engine registers handlers
//! and mounts into. It is generic over the stored value, so it knows
//! nothing about HTTP handlers; it only maps a method and a path to a value
//! plus the named parameters the pattern captured.
//!
//! # Features
//!
//! - **Method-qualified patterns**: `"GET /users/{id}"`, or `"/users/{id}"` for any method
//! - **Path parameters**: `{id}` binds one segment
//! - **Catch-alls**: `{path...}` (or `*path`) binds the rest of the path
//! - **Subtree patterns**: a trailing `/` matches everything below the prefix
//! - **Registration errors**: duplicates and malformed patterns are reported, never silently replaced
//!
//! # Example
//!
//! ```rust
//! use switchyard_router::Router;
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.insert("GET /users", "list").unwrap();
//! router.insert("GET /users/{id}", "show").unwrap();
//! router.insert("/files/{path...}", "files").unwrap();
//!
//! let m = router.at(&Method::GET, "/users/123").unwrap();
//! assert_eq!(*m.value, "show");
//! assert_eq!(m.params.get("id"), Some("123"));
//!
//! let m = router.at(&Method::GET, "/files/images/logo.png").unwrap();
//! assert_eq!(m.params.get("path"), Some("images/logo.png"));
//!
//! assert!(router.insert("GET /users", "again").is_err());
//! ```
//!
//! # Architecture
//!
//! ```text
//!                    (root)
//!                      │
//!              ┌───────┴───────┐
//!              │               │
//!            "users"        "files"
//!              │               │
//!        ┌─────┴─────┐    "{path...}"
//!        │           │
//!     (exact)      "{id}"
//!      [GET]         │
//!                 (exact)
//!                  [GET]
//! ```

mod error;
mod method_router;
mod node;
mod params;
mod pattern;
mod router;

pub use error::{MatchError, RouteError};
pub use params::Params;
pub use pattern::{Pattern, PatternKind, Segment};
pub use router::{Match, Router};

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_basic_routing() {
        let mut router = Router::new();
        router.insert("/users", "listUsers").unwrap();
        router.insert("/users/{id}", "getUser").unwrap();

        let m = router.at(&Method::GET, "/users").unwrap();
        assert_eq!(*m.value, "listUsers");
        assert!(m.params.is_empty());

        let m = router.at(&Method::GET, "/users/123").unwrap();
        assert_eq!(*m.value, "getUser");
        assert_eq!(m.params.get("id"), Some("123"));
    }

    #[test]
    fn test_method_routing() {
        let mut router = Router::new();
        router.insert("GET /users", "listUsers").unwrap();
        router.insert("POST /users", "createUser").unwrap();

        assert_eq!(*router.at(&Method::GET, "/users").unwrap().value, "listUsers");
        assert_eq!(*router.at(&Method::POST, "/users").unwrap().value, "createUser");
        assert!(matches!(
            router.at(&Method::DELETE, "/users"),
            Err(MatchError::MethodNotAllowed { .. })
        ));
    }

    #[test]
    fn test_multiple_params() {
        let mut router = Router::new();
        router
            .insert("/orgs/{orgId}/users/{userId}", "getOrgUser")
            .unwrap();

        let m = router.at(&Method::GET, "/orgs/acme/users/123").unwrap();
        assert_eq!(*m.value, "getOrgUser");
        assert_eq!(m.params.get("orgId"), Some("acme"));
        assert_eq!(m.params.get("userId"), Some("123"));
    }

    #[test]
    fn test_static_vs_param_priority() {
        let mut router = Router::new();
        router.insert("/users/me", "getCurrentUser").unwrap();
        router.insert("/users/{id}", "getUser").unwrap();

        assert_eq!(
            *router.at(&Method::GET, "/users/me").unwrap().value,
            "getCurrentUser"
        );
        assert_eq!(*router.at(&Method::GET, "/users/7").unwrap().value, "getUser");
    }

    #[test]
    fn test_subtree_registration_collides_only_with_subtree() {
        let mut router = Router::new();
        router.insert("/api", "exact").unwrap();
        router.insert("/api/", "mount").unwrap();
        assert!(matches!(
            router.insert("/api/", "again"),
            Err(RouteError::Duplicate { .. })
        ));
    }
}
