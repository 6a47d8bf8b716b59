//! Pattern parsing.
//!
//! A pattern is `"[METHOD ]/path"`. The path is split on `/` into segments:
//!
//! | Segment        | Meaning                                        |
//! |----------------|------------------------------------------------|
//! | `users`        | literal                                        |
//! | `{id}`         | binds exactly one segment                      |
//! | `{rest...}`    | binds the remaining path, must be last         |
//! | `*rest`        | same as `{rest...}`                            |
//! | `{$}` (last)   | forces an exact match of a trailing-slash path |
//!
//! A path ending in `/` is a subtree pattern: it matches itself and
//! everything below it. Segments are positional, so `/users` and
//! `/users/{$}` are different patterns, and an empty segment (as in
//! `/a//b`) only matches an empty request segment.

use std::fmt;

use http::Method;

use crate::error::RouteError;

/// One parsed path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text (e.g. `users`). Empty for the slash `{$}` anchors.
    Static(String),
    /// Named single-segment parameter (e.g. `{id}`).
    Param(String),
    /// Named catch-all (e.g. `{path...}` or `*path`).
    CatchAll(String),
}

/// How the end of a pattern matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Matches only the path itself.
    Exact,
    /// Matches the path and every path below it.
    Subtree,
}

/// A parsed `"[METHOD ]/path"` pattern.
///
/// # Example
///
/// ```rust
/// use switchyard_router::{Pattern, PatternKind, Segment};
/// use http::Method;
///
/// let pattern = Pattern::parse("GET /users/{id}").unwrap();
/// assert_eq!(pattern.method(), Some(&Method::GET));
/// assert_eq!(pattern.kind(), PatternKind::Exact);
/// assert_eq!(pattern.segments()[1], Segment::Param("id".to_string()));
///
/// let subtree = Pattern::parse("/static/").unwrap();
/// assert_eq!(subtree.kind(), PatternKind::Subtree);
/// assert_eq!(subtree.method(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    method: Option<Method>,
    path: String,
    segments: Vec<Segment>,
    kind: PatternKind,
}

impl Pattern {
    /// Parses a pattern string.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RouteError::Empty);
        }

        let (method, path) = if trimmed.starts_with('/') {
            (None, trimmed)
        } else {
            let (token, rest) = trimmed
                .split_once(char::is_whitespace)
                .ok_or_else(|| RouteError::MissingLeadingSlash(trimmed.to_string()))?;
            let method = Method::from_bytes(token.as_bytes())
                .map_err(|_| RouteError::InvalidMethod(token.to_string()))?;
            (Some(method), rest.trim_start())
        };

        if !path.starts_with('/') {
            return Err(RouteError::MissingLeadingSlash(path.to_string()));
        }
        if path.contains(char::is_whitespace) {
            return Err(RouteError::InvalidSegment(path.to_string()));
        }

        let (body, kind) = if let Some(body) = path.strip_suffix("{$}") {
            if !body.ends_with('/') {
                return Err(RouteError::InvalidSegment("{$}".to_string()));
            }
            (body, PatternKind::Exact)
        } else if path.ends_with('/') {
            (path, PatternKind::Subtree)
        } else {
            (path, PatternKind::Exact)
        };

        let segments = parse_segments(body, kind)?;

        Ok(Self {
            raw: trimmed.to_string(),
            method,
            path: path.to_string(),
            segments,
            kind,
        })
    }

    /// The pattern as written (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The method restriction, or `None` for any method.
    #[must_use]
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    /// The path portion, including any trailing `/` or `{$}`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Parsed segments, in path order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the pattern is exact or a subtree.
    #[must_use]
    pub fn kind(&self) -> PatternKind {
        self.kind
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_segments(body: &str, kind: PatternKind) -> Result<Vec<Segment>, RouteError> {
    let mut raw: Vec<&str> = body.strip_prefix('/').unwrap_or(body).split('/').collect();
    // The trailing slash of a subtree is not a segment of its own.
    if kind == PatternKind::Subtree {
        raw.pop();
    }
    let mut segments = Vec::with_capacity(raw.len());
    let mut names: Vec<String> = Vec::new();

    for (index, text) in raw.iter().enumerate() {
        let segment = parse_segment(text)?;

        match &segment {
            Segment::Param(name) | Segment::CatchAll(name) => {
                if names.contains(name) {
                    return Err(RouteError::DuplicateParam(name.clone()));
                }
                names.push(name.clone());
            }
            Segment::Static(_) => {}
        }

        if matches!(segment, Segment::CatchAll(_))
            && (index + 1 != raw.len() || kind == PatternKind::Subtree)
        {
            return Err(RouteError::CatchAllNotLast((*text).to_string()));
        }

        segments.push(segment);
    }

    Ok(segments)
}

fn parse_segment(text: &str) -> Result<Segment, RouteError> {
    if let Some(rest) = text.strip_prefix('{') {
        let inner = rest
            .strip_suffix('}')
            .ok_or_else(|| RouteError::InvalidSegment(text.to_string()))?;
        let (name, catch_all) = match inner.strip_suffix("...") {
            Some(name) => (name, true),
            None => (inner, false),
        };
        check_name(name, text)?;
        return Ok(if catch_all {
            Segment::CatchAll(name.to_string())
        } else {
            Segment::Param(name.to_string())
        });
    }

    if let Some(name) = text.strip_prefix('*') {
        check_name(name, text)?;
        return Ok(Segment::CatchAll(name.to_string()));
    }

    if text.contains(['{', '}', '*']) {
        return Err(RouteError::InvalidSegment(text.to_string()));
    }

    Ok(Segment::Static(text.to_string()))
}

fn check_name(name: &str, text: &str) -> Result<(), RouteError> {
    if name.is_empty() {
        return Err(RouteError::EmptyParamName(text.to_string()));
    }
    if name.contains(['{', '}', '*', '$']) {
        return Err(RouteError::InvalidSegment(text.to_string()));
    }
    Ok(())
}
