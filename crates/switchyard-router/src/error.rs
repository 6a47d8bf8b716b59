//! Registration and lookup errors.

use http::Method;
use thiserror::Error;

/// Errors raised while parsing or registering a pattern.
///
/// These are programmer errors in route setup: a router that reports one
/// should not be served.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The pattern string is empty or only whitespace.
    #[error("pattern is empty")]
    Empty,

    /// The path portion does not start with `/`.
    #[error("path {0:?} must start with '/'")]
    MissingLeadingSlash(String),

    /// The method prefix is not a valid HTTP method token.
    #[error("invalid method token {0:?}")]
    InvalidMethod(String),

    /// A segment uses braces or `*` in an unsupported way.
    #[error("invalid segment {0:?}")]
    InvalidSegment(String),

    /// A `{}` or `*` segment carries no name.
    #[error("parameter name is empty in segment {0:?}")]
    EmptyParamName(String),

    /// The same parameter name is bound twice in one pattern.
    #[error("parameter {0:?} appears more than once")]
    DuplicateParam(String),

    /// A catch-all segment is followed by more path.
    #[error("catch-all segment {0:?} must be the last segment")]
    CatchAllNotLast(String),

    /// The method+path combination is already registered.
    #[error("pattern {route:?} is already registered")]
    Duplicate {
        /// The rejected pattern, as written.
        route: String,
    },
}

/// Outcome of a lookup that found no handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// No pattern matches the path.
    #[error("no route matches the request path")]
    NotFound,

    /// The path matches, but only for other methods.
    #[error("method not allowed")]
    MethodNotAllowed {
        /// Methods that would have matched, in registration order.
        allowed: Vec<Method>,
    },
}
