//! The handler capability.
//!
//! Every request-processing value in Switchyard is a [`Handler`]: an endpoint
//! function, a mounted sub-router, a middleware-wrapped chain, and a
//! finalized router all have the same type once boxed. Mounting a router
//! inside another is therefore just registering one more handler.

use std::future::Future;
use std::sync::Arc;

use crate::types::{BoxFuture, Request, Response};

/// Something that turns a request into a response.
///
/// The returned future is `'static`, so a handler can be shared through an
/// [`Arc`] and invoked from many tasks at once. Implementations must not
/// keep per-request state in `self`.
///
/// # Example
///
/// ```rust
/// use switchyard_core::{BoxFuture, Handler, Request, Response, ResponseExt};
/// use http::StatusCode;
///
/// struct Pong;
///
/// impl Handler for Pong {
///     fn call(&self, _request: Request) -> BoxFuture<'static, Response> {
///         Box::pin(async { Response::text(StatusCode::OK, "pong") })
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Handles one request.
    fn call(&self, request: Request) -> BoxFuture<'static, Response>;
}

/// A type-erased, shareable handler.
pub type BoxedHandler = Arc<dyn Handler>;

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn call(&self, request: Request) -> BoxFuture<'static, Response> {
        (**self).call(request)
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn call(&self, request: Request) -> BoxFuture<'static, Response> {
        (**self).call(request)
    }
}

/// Erases a handler's type.
pub fn boxed<H: Handler>(handler: H) -> BoxedHandler {
    Arc::new(handler)
}

/// A handler built from an async closure. See [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    func: F,
}

impl<F> std::fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, request: Request) -> BoxFuture<'static, Response> {
        Box::pin((self.func)(request))
    }
}

/// Adapts an async closure into a [`Handler`].
///
/// # Example
///
/// ```rust
/// use switchyard_core::{handler_fn, Handler, Response, ResponseExt};
/// use http::StatusCode;
///
/// let hello = handler_fn(|_req| async { Response::text(StatusCode::OK, "hello") });
/// # let _ = &hello;
/// ```
pub const fn handler_fn<F, Fut>(func: F) -> HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    HandlerFn { func }
}
