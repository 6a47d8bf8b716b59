//! Builder and finalized router.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use switchyard_core::{
    boxed, handler_fn, BoxFuture, BoxedHandler, Handler, Request, Response,
};
use switchyard_middleware::{Middleware, MiddlewareStack};
use switchyard_router::Router as Routes;
use tracing::info;

use crate::dispatch::Dispatcher;
use crate::error::ConfigError;
use crate::table::{MountTable, PatternTable};

/// Accumulates patterns, mounts and middleware until [`finalize`](Self::finalize).
///
/// Every method takes the builder by value and returns it, so calls chain.
/// Adding never fails; all checking happens at finalize.
///
/// # Example
///
/// ```rust
/// use switchyard::prelude::*;
/// use http::StatusCode;
///
/// let api = Router::builder()
///     .handle_fn("GET /ping", |_req| async { Response::text(StatusCode::OK, "pong") })
///     .finalize()
///     .unwrap();
///
/// let app = Router::builder()
///     .middleware(AccessLog::new())
///     .middleware(Recovery::new())
///     .mount("/api/", api)
///     .finalize()
///     .unwrap();
/// # let _ = app;
/// ```
#[derive(Clone, Default)]
pub struct RouterBuilder {
    patterns: PatternTable,
    mounts: MountTable,
    middleware: MiddlewareStack,
}

impl RouterBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `pattern` (`"[METHOD ]/path"`).
    pub fn handle<H: Handler>(mut self, pattern: impl Into<String>, handler: H) -> Self {
        self.patterns.push(pattern.into(), boxed(handler));
        self
    }

    /// Registers an async closure for `pattern`.
    pub fn handle_fn<F, Fut>(self, pattern: impl Into<String>, func: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.handle(pattern, handler_fn(func))
    }

    /// Delegates every request under `prefix` to `handler`, with the prefix
    /// removed from the path it sees.
    ///
    /// A trailing `/` on the prefix is optional; `/api` and `/api/` mount
    /// the same subtree.
    pub fn mount<H: Handler>(mut self, prefix: impl Into<String>, handler: H) -> Self {
        self.mounts.push(prefix.into(), boxed(handler));
        self
    }

    /// Adds a middleware inside all previously added ones.
    pub fn middleware<M: Middleware>(mut self, middleware: M) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Builds the router.
    ///
    /// Registers all patterns, then all mounts, into a fresh matcher, and
    /// wraps the result in the middleware, first added outermost. Consumes
    /// the builder; to build a second router, clone the builder first.
    pub fn finalize(self) -> Result<Router, ConfigError> {
        let pattern_count = self.patterns.len();
        let mount_count = self.mounts.len();

        let mut routes = Routes::new();
        self.patterns.register(&mut routes)?;
        self.mounts.register(&mut routes)?;

        let patterns: Arc<[String]> = routes.patterns().map(str::to_string).collect();
        let middleware: Arc<[&'static str]> = self.middleware.names().into();

        let dispatcher: BoxedHandler = Arc::new(Dispatcher::new(routes));
        let handler = self.middleware.fold(dispatcher);

        info!(
            patterns = pattern_count,
            mounts = mount_count,
            middleware = ?middleware,
            "Router finalized"
        );

        Ok(Router {
            handler,
            patterns,
            middleware,
        })
    }
}

impl fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("patterns", &self.patterns.len())
            .field("mounts", &self.mounts.len())
            .field("middleware", &self.middleware)
            .finish()
    }
}

/// A finalized, immutable router.
///
/// Cheap to clone; clones share the same handler chain. A `Router` is itself
/// a [`Handler`], so it can be mounted inside another builder or served
/// directly.
#[derive(Clone)]
pub struct Router {
    handler: BoxedHandler,
    patterns: Arc<[String]>,
    middleware: Arc<[&'static str]>,
}

impl Router {
    /// Starts a new builder.
    #[must_use]
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Every registered pattern, direct patterns first, then mount patterns.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Middleware names, outermost first.
    pub fn middleware(&self) -> &[&'static str] {
        &self.middleware
    }

    /// The folded handler chain.
    pub fn into_handler(self) -> BoxedHandler {
        self.handler
    }
}

impl Handler for Router {
    fn call(&self, request: Request) -> BoxFuture<'static, Response> {
        self.handler.call(request)
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("patterns", &self.patterns)
            .field("middleware", &self.middleware)
            .finish_non_exhaustive()
    }
}
