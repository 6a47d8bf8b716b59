//! Core middleware trait and adapters.
//!
//! A middleware is a function from one handler to another. Whatever the
//! wrapper does before delegating is its pre-logic, whatever it does after
//! the inner future resolves is its post-logic, and a wrapper that never
//! delegates short-circuits the chain.
//!
//! # Example
//!
//! ```rust
//! use switchyard_core::{Response, ResponseExt};
//! use switchyard_middleware::{from_fn, Middleware};
//! use http::StatusCode;
//!
//! let require_key = from_fn("require-key", |req, next| async move {
//!     if req.headers().contains_key("x-api-key") {
//!         next.run(req).await
//!     } else {
//!         Response::text(StatusCode::UNAUTHORIZED, "missing key")
//!     }
//! });
//! assert_eq!(require_key.name(), "require-key");
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use switchyard_core::{BoxFuture, BoxedHandler, Handler, Request, Response};

/// A handler-to-handler transformation.
///
/// `wrap` runs once, when the router is finalized; the handler it returns
/// runs once per request.
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware.
    ///
    /// Used for logging and debugging.
    fn name(&self) -> &'static str;

    /// Wraps `inner`, returning the handler that replaces it.
    fn wrap(&self, inner: BoxedHandler) -> BoxedHandler;
}

impl<M: Middleware + ?Sized> Middleware for Arc<M> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn wrap(&self, inner: BoxedHandler) -> BoxedHandler {
        (**self).wrap(inner)
    }
}

impl<M: Middleware + ?Sized> Middleware for Box<M> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn wrap(&self, inner: BoxedHandler) -> BoxedHandler {
        (**self).wrap(inner)
    }
}

/// The rest of the chain, as seen from an around-style middleware.
///
/// Running it consumes it, so a middleware delegates at most once.
#[derive(Clone)]
pub struct Next {
    inner: BoxedHandler,
}

impl Next {
    /// Creates a continuation that invokes `inner`.
    pub fn new(inner: BoxedHandler) -> Self {
        Self { inner }
    }

    /// Invokes the next middleware or handler in the chain.
    pub fn run(self, request: Request) -> BoxFuture<'static, Response> {
        self.inner.call(request)
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// A middleware built from an around-style async function. See [`from_fn`].
pub struct FnMiddleware<F> {
    name: &'static str,
    func: Arc<F>,
}

impl<F> FnMiddleware<F> {
    /// Creates a new function-based middleware.
    pub fn new(name: &'static str, func: F) -> Self {
        Self {
            name,
            func: Arc::new(func),
        }
    }
}

impl<F> fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMiddleware")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn wrap(&self, inner: BoxedHandler) -> BoxedHandler {
        Arc::new(FnLayer {
            func: Arc::clone(&self.func),
            inner,
        })
    }
}

struct FnLayer<F> {
    func: Arc<F>,
    inner: BoxedHandler,
}

impl<F, Fut> Handler for FnLayer<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, request: Request) -> BoxFuture<'static, Response> {
        Box::pin((self.func)(request, Next::new(Arc::clone(&self.inner))))
    }
}

/// Creates a middleware from an async `(request, next)` function.
pub fn from_fn<F, Fut>(name: &'static str, func: F) -> FnMiddleware<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    FnMiddleware::new(name, func)
}

/// A middleware built from a plain handler-to-handler function. See [`wrap_fn`].
pub struct WrapFn<F> {
    name: &'static str,
    func: F,
}

impl<F> fmt::Debug for WrapFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapFn")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<F> Middleware for WrapFn<F>
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn wrap(&self, inner: BoxedHandler) -> BoxedHandler {
        (self.func)(inner)
    }
}

/// Creates a middleware from a `BoxedHandler -> BoxedHandler` function.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use switchyard_core::{handler_fn, BoxedHandler, Handler};
/// use switchyard_middleware::wrap_fn;
///
/// let header = wrap_fn("server-header", |inner: BoxedHandler| -> BoxedHandler {
///     Arc::new(handler_fn(move |req| {
///         let response = inner.call(req);
///         async move {
///             let mut response = response.await;
///             response.headers_mut().insert("server", "switchyard".parse().unwrap());
///             response
///         }
///     }))
/// });
/// # let _ = header;
/// ```
pub const fn wrap_fn<F>(name: &'static str, func: F) -> WrapFn<F>
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
{
    WrapFn { name, func }
}
