//! Ordered middleware accumulation and folding.
//!
//! ```text
//!  push order:   m1, m2, m3
//!
//!  fold(inner):  m1( m2( m3( inner ) ) )
//!
//!  request  ──► m1.pre ─► m2.pre ─► m3.pre ─► inner
//!  response ◄── m1.post ◄ m2.post ◄ m3.post ◄──┘
//! ```

use std::fmt;
use std::sync::Arc;

use switchyard_core::BoxedHandler;

use crate::middleware::Middleware;

/// Middleware in the order it was added, first added outermost.
#[derive(Clone, Default)]
pub struct MiddlewareStack {
    layers: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware. It runs inside everything pushed before it.
    pub fn push<M: Middleware>(&mut self, middleware: M) {
        self.layers.push(Arc::new(middleware));
    }

    /// Number of middleware in the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if nothing has been pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Names in execution order, outermost first.
    pub fn names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|m| m.name()).collect()
    }

    /// Wraps `inner` in every middleware, last-added innermost.
    ///
    /// An empty stack returns `inner` unchanged.
    pub fn fold(&self, inner: BoxedHandler) -> BoxedHandler {
        self.layers
            .iter()
            .rev()
            .fold(inner, |handler, middleware| middleware.wrap(handler))
    }
}

impl fmt::Debug for MiddlewareStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareStack")
            .field("layers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{from_fn, Next};
    use bytes::Bytes;
    use http::StatusCode;
    use http_body_util::Full;
    use parking_lot::Mutex;
    use switchyard_core::{boxed, handler_fn, Handler, Request, Response, ResponseExt};

    type Events = Arc<Mutex<Vec<String>>>;

    fn recorder(name: &'static str, events: &Events) -> impl Middleware {
        let events = Arc::clone(events);
        from_fn(name, move |req, next: Next| {
            let events = Arc::clone(&events);
            async move {
                events.lock().push(format!("{name}-before"));
                let response = next.run(req).await;
                events.lock().push(format!("{name}-after"));
                response
            }
        })
    }

    fn request() -> Request {
        http::Request::builder()
            .uri("/")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[test]
    fn test_empty_stack() {
        let stack = MiddlewareStack::new();
        assert!(stack.is_empty());
        assert!(stack.names().is_empty());
    }

    #[tokio::test]
    async fn test_empty_stack_returns_inner() {
        let stack = MiddlewareStack::new();
        let inner = boxed(handler_fn(|_| async { Response::empty(StatusCode::ACCEPTED) }));
        let folded = stack.fold(Arc::clone(&inner));

        assert!(Arc::ptr_eq(&inner, &folded));
        assert_eq!(folded.call(request()).await.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_fold_is_onion_ordered() {
        let events: Events = Arc::default();
        let mut stack = MiddlewareStack::new();
        stack.push(recorder("m1", &events));
        stack.push(recorder("m2", &events));
        stack.push(recorder("m3", &events));
        assert_eq!(stack.names(), vec!["m1", "m2", "m3"]);

        let handler_events = Arc::clone(&events);
        let inner = boxed(handler_fn(move |_| {
            let events = Arc::clone(&handler_events);
            async move {
                events.lock().push("handler".to_string());
                Response::empty(StatusCode::OK)
            }
        }));

        stack.fold(inner).call(request()).await;

        assert_eq!(
            *events.lock(),
            vec![
                "m1-before",
                "m2-before",
                "m3-before",
                "handler",
                "m3-after",
                "m2-after",
                "m1-after"
            ]
        );
    }

    #[test]
    fn test_debug_lists_names() {
        let events: Events = Arc::default();
        let mut stack = MiddlewareStack::new();
        stack.push(recorder("outer", &events));
        assert_eq!(
            format!("{stack:?}"),
            r#"MiddlewareStack { layers: ["outer"] }"#
        );
    }
}
