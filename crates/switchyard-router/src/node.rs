//! Radix tree node.
//!
//! Each node is one path segment. A node can terminate two kinds of
//! pattern: an exact pattern (`/users`) and a subtree pattern (`/users/`),
//! each with its own method table. Parameter and catch-all children are
//! anonymous: their names live on the endpoints, so patterns that differ
//! only in parameter names share nodes without clashing.

use http::Method;
use smallvec::SmallVec;

use crate::error::RouteError;
use crate::method_router::{Endpoint, MethodRouter};
use crate::params::Params;
use crate::pattern::{Pattern, PatternKind, Segment};

/// Captured parameter values, in path order, borrowed from the request path.
type Captures<'p> = SmallVec<[&'p str; 4]>;

/// A request path segment and its byte offset in the path.
type Piece<'p> = (usize, &'p str);

/// A node in the radix tree.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    /// Literal text; empty for the root and for parameter nodes.
    segment: String,

    /// Endpoints of exact patterns ending here.
    exact: Option<MethodRouter<T>>,

    /// Endpoints of subtree patterns rooted here.
    subtree: Option<MethodRouter<T>>,

    /// Static children, sorted by segment for binary search
    static_children: Vec<Node<T>>,

    /// At most one parameter child per node
    param_child: Option<Box<Node<T>>>,

    /// At most one catch-all child per node, always a leaf
    catch_all_child: Option<Box<Node<T>>>,
}

/// Methods seen on paths that matched but had no endpoint for the request method.
#[derive(Debug, Default)]
pub(crate) struct Allowed(Vec<Method>);

impl Allowed {
    fn extend(&mut self, methods: Vec<Method>) {
        for method in methods {
            if !self.0.contains(&method) {
                self.0.push(method);
            }
        }
    }

    pub(crate) fn into_inner(self) -> Vec<Method> {
        self.0
    }
}

impl<T> Node<T> {
    fn new(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            exact: None,
            subtree: None,
            static_children: Vec::new(),
            param_child: None,
            catch_all_child: None,
        }
    }

    /// Creates the root node of a tree.
    pub(crate) fn root() -> Self {
        Self::new("")
    }

    /// Registers `value` under a parsed pattern.
    pub(crate) fn insert(&mut self, pattern: &Pattern, value: T) -> Result<(), RouteError> {
        let leaf = self.descend(pattern.segments());
        let table = match pattern.kind() {
            PatternKind::Exact => leaf.exact.get_or_insert_with(MethodRouter::new),
            PatternKind::Subtree => leaf.subtree.get_or_insert_with(MethodRouter::new),
        };

        if table.contains(pattern.method()) {
            return Err(RouteError::Duplicate {
                route: pattern.as_str().to_string(),
            });
        }

        let names = pattern
            .segments()
            .iter()
            .filter_map(|segment| match segment {
                Segment::Param(name) | Segment::CatchAll(name) => Some(name.clone()),
                Segment::Static(_) => None,
            })
            .collect();

        table.insert(
            pattern.method().cloned(),
            Endpoint {
                pattern: pattern.as_str().to_string(),
                names,
                value,
            },
        );
        Ok(())
    }

    /// Walks (and creates) the nodes for `segments`, returning the last one.
    fn descend(&mut self, segments: &[Segment]) -> &mut Self {
        let Some((first, rest)) = segments.split_first() else {
            return self;
        };

        let child = match first {
            Segment::Static(text) => {
                let index = match self
                    .static_children
                    .binary_search_by(|c| c.segment.as_str().cmp(text))
                {
                    Ok(index) => index,
                    Err(index) => {
                        self.static_children.insert(index, Node::new(text.clone()));
                        index
                    }
                };
                &mut self.static_children[index]
            }
            Segment::Param(_) => self
                .param_child
                .get_or_insert_with(|| Box::new(Node::new("")))
                .as_mut(),
            Segment::CatchAll(_) => self
                .catch_all_child
                .get_or_insert_with(|| Box::new(Node::new("")))
                .as_mut(),
        };

        child.descend(rest)
    }

    /// Finds the endpoint for `method` and `path`, binding its parameters
    /// into `params`.
    ///
    /// Segments are compared positionally: `/users/` has a trailing empty
    /// segment and does not match the exact pattern `/users`.
    ///
    /// Returns `None` when nothing answers; `allowed` then holds the methods
    /// of any paths that matched under a different method.
    pub(crate) fn find<'a>(
        &'a self,
        method: &Method,
        path: &str,
        params: &mut Params,
        allowed: &mut Allowed,
    ) -> Option<&'a Endpoint<T>> {
        let rest = path.strip_prefix('/').unwrap_or(path);
        let mut offset = 0;
        let pieces: SmallVec<[Piece<'_>; 8]> = rest
            .split('/')
            .map(|text| {
                let piece = (offset, text);
                offset += text.len() + 1;
                piece
            })
            .collect();

        let mut captures = Captures::new();
        let found = self.find_pieces(rest, &pieces, method, &mut captures, allowed)?;
        for (name, value) in found.names.iter().zip(&captures) {
            params.push(name.as_str(), *value);
        }
        Some(found)
    }

    fn find_pieces<'a, 'p>(
        &'a self,
        path: &'p str,
        pieces: &[Piece<'p>],
        method: &Method,
        captures: &mut Captures<'p>,
        allowed: &mut Allowed,
    ) -> Option<&'a Endpoint<T>> {
        if let Some((&(start, segment), rest)) = pieces.split_first() {
            // Static first
            if let Some(child) = self.find_static_child(segment) {
                if let Some(found) = child.find_pieces(path, rest, method, captures, allowed) {
                    return Some(found);
                }
            }

            let mark = captures.len();

            if let Some(child) = &self.param_child {
                if !segment.is_empty() {
                    captures.push(segment);
                    if let Some(found) = child.find_pieces(path, rest, method, captures, allowed)
                    {
                        return Some(found);
                    }
                    captures.truncate(mark);
                }
            }

            if let Some(child) = &self.catch_all_child {
                captures.push(&path[start..]);
                if let Some(found) = resolve(child.exact.as_ref(), method, allowed) {
                    return Some(found);
                }
                captures.truncate(mark);
            }
        } else if let Some(found) = resolve(self.exact.as_ref(), method, allowed) {
            return Some(found);
        }

        // Subtree patterns match this node and anything below it
        resolve(self.subtree.as_ref(), method, allowed)
    }

    fn find_static_child(&self, segment: &str) -> Option<&Self> {
        self.static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
            .ok()
            .map(|i| &self.static_children[i])
    }
}

fn resolve<'a, T>(
    table: Option<&'a MethodRouter<T>>,
    method: &Method,
    allowed: &mut Allowed,
) -> Option<&'a Endpoint<T>> {
    let table = table?;
    let found = table.get(method);
    if found.is_none() {
        allowed.extend(table.allowed());
    }
    found
}
