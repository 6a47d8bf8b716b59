//! High-level router API.

use http::Method;

use crate::error::{MatchError, RouteError};
use crate::node::{Allowed, Node};
use crate::params::Params;
use crate::pattern::Pattern;

/// A successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'a, T> {
    /// The value registered for the pattern.
    pub value: &'a T,
    /// The pattern that matched, as written at registration.
    pub pattern: &'a str,
    /// Bindings for the pattern's named segments.
    pub params: Params,
}

/// A radix tree router mapping `"[METHOD ]/path"` patterns to values.
///
/// # Example
///
/// ```rust
/// use switchyard_router::{MatchError, Router};
/// use http::Method;
///
/// let mut router = Router::new();
/// router.insert("GET /users/{id}", "get_user").unwrap();
/// router.insert("/static/", "assets").unwrap();
///
/// let m = router.at(&Method::GET, "/users/42").unwrap();
/// assert_eq!(*m.value, "get_user");
/// assert_eq!(m.params.get("id"), Some("42"));
///
/// assert_eq!(*router.at(&Method::POST, "/static/app.js").unwrap().value, "assets");
///
/// assert_eq!(
///     router.at(&Method::DELETE, "/users/42"),
///     Err(MatchError::MethodNotAllowed { allowed: vec![Method::GET, Method::HEAD] })
/// );
/// assert_eq!(router.at(&Method::GET, "/nope"), Err(MatchError::NotFound));
/// ```
///
/// # Route Priority
///
/// When more than one pattern could match, the router prefers, segment by
/// segment:
///
/// 1. **Static segments** (`/users/me`)
/// 2. **Parameter segments** (`/users/{id}`)
/// 3. **Catch-all segments** (`/files/{path...}`)
/// 4. **Subtree patterns** (`/users/`), deepest first
///
/// and backtracks when a branch has no endpoint for the request method.
#[derive(Debug, Clone)]
pub struct Router<T> {
    root: Node<T>,
    patterns: Vec<String>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            patterns: Vec::new(),
        }
    }

    /// Parses `pattern` and registers `value` under it.
    ///
    /// Fails on a malformed pattern or on a method+path combination that is
    /// already registered. Patterns that differ only in parameter names
    /// (`/users/{id}`, `/users/{userId}`) are the same path.
    pub fn insert(&mut self, pattern: &str, value: T) -> Result<(), RouteError> {
        let pattern = Pattern::parse(pattern)?;
        self.insert_pattern(&pattern, value)
    }

    /// Registers `value` under an already parsed pattern.
    pub fn insert_pattern(&mut self, pattern: &Pattern, value: T) -> Result<(), RouteError> {
        self.root.insert(pattern, value)?;
        self.patterns.push(pattern.as_str().to_string());
        Ok(())
    }

    /// Looks up the value for a request method and path.
    pub fn at(&self, method: &Method, path: &str) -> Result<Match<'_, T>, MatchError> {
        let mut params = Params::new();
        let mut allowed = Allowed::default();

        match self.root.find(method, path, &mut params, &mut allowed) {
            Some(endpoint) => Ok(Match {
                value: &endpoint.value,
                pattern: &endpoint.pattern,
                params,
            }),
            None => {
                let allowed = allowed.into_inner();
                if allowed.is_empty() {
                    Err(MatchError::NotFound)
                } else {
                    Err(MatchError::MethodNotAllowed { allowed })
                }
            }
        }
    }

    /// Registered patterns, in registration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    /// Number of registered patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_new_is_empty() {
        let router: Router<()> = Router::new();
        assert!(router.is_empty());
        assert_eq!(router.at(&Method::GET, "/"), Err(MatchError::NotFound));
    }

    #[test]
    fn test_router_tracks_patterns() {
        let mut router = Router::new();
        router.insert("GET /a", 1).unwrap();
        router.insert("/b/", 2).unwrap();

        assert_eq!(router.len(), 2);
        assert_eq!(router.patterns().collect::<Vec<_>>(), vec!["GET /a", "/b/"]);
    }

    #[test]
    fn test_failed_insert_is_not_recorded() {
        let mut router = Router::new();
        router.insert("/a", 1).unwrap();
        assert!(router.insert("/a", 2).is_err());
        assert!(router.insert("a", 3).is_err());
        assert_eq!(router.len(), 1);
        assert_eq!(*router.at(&Method::GET, "/a").unwrap().value, 1);
    }

    #[test]
    fn test_router_match_param() {
        let mut router = Router::new();
        router.insert("/hello/{name}", "hello").unwrap();

        let m = router.at(&Method::GET, "/hello/switchyard").unwrap();
        assert_eq!(*m.value, "hello");
        assert_eq!(m.pattern, "/hello/{name}");
        assert_eq!(m.params.get("name"), Some("switchyard"));
    }

    #[test]
    fn test_router_literal_param_value() {
        let mut router = Router::new();
        router.insert("/tags/{tag}", ()).unwrap();

        let m = router.at(&Method::GET, "/tags/a%20b").unwrap();
        assert_eq!(m.params.get("tag"), Some("a%20b"));
    }

    #[test]
    fn test_router_any_method() {
        let mut router = Router::new();
        router.insert("/any", "any").unwrap();

        for method in [Method::GET, Method::POST, Method::PATCH, Method::OPTIONS] {
            assert_eq!(*router.at(&method, "/any").unwrap().value, "any");
        }
    }

    #[test]
    fn test_router_trailing_slash_is_not_folded_for_exact() {
        let mut router = Router::new();
        router.insert("/users", "users").unwrap();

        assert!(router.at(&Method::GET, "/users").is_ok());
        for path in ["/users/", "//users", "/users//", "/users/1"] {
            assert_eq!(router.at(&Method::GET, path), Err(MatchError::NotFound), "{path}");
        }

        router.insert("/users/{$}", "slash").unwrap();
        assert_eq!(*router.at(&Method::GET, "/users/").unwrap().value, "slash");
        assert_eq!(*router.at(&Method::GET, "/users").unwrap().value, "users");
    }

    #[test]
    fn test_router_params_named_per_pattern() {
        let mut router = Router::new();
        router.insert("GET /users/{id}", "get").unwrap();
        router.insert("DELETE /users/{userId}", "delete").unwrap();

        let m = router.at(&Method::GET, "/users/9").unwrap();
        assert_eq!(m.pattern, "GET /users/{id}");
        assert_eq!(m.params.get("id"), Some("9"));

        let m = router.at(&Method::DELETE, "/users/9").unwrap();
        assert_eq!(m.pattern, "DELETE /users/{userId}");
        assert_eq!(m.params.get("userId"), Some("9"));
    }

    #[test]
    fn test_router_exact_root() {
        let mut router = Router::new();
        router.insert("/{$}", "home").unwrap();

        assert!(router.at(&Method::GET, "/").is_ok());
        assert_eq!(router.at(&Method::GET, "/x"), Err(MatchError::NotFound));
    }

    #[test]
    fn test_router_method_not_allowed_lists_methods() {
        let mut router = Router::new();
        router.insert("PUT /doc", 1).unwrap();
        router.insert("DELETE /doc", 2).unwrap();

        assert_eq!(
            router.at(&Method::GET, "/doc"),
            Err(MatchError::MethodNotAllowed {
                allowed: vec![Method::PUT, Method::DELETE]
            })
        );
    }

    #[test]
    fn test_router_clone() {
        let mut router = Router::new();
        router.insert("/users", "users").unwrap();

        let cloned = router.clone();
        assert!(cloned.at(&Method::GET, "/users").is_ok());
    }
}
