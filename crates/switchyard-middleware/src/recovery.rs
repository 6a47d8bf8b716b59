//! Panic recovery middleware.
//!
//! A panic inside the wrapped chain is caught and turned into a response
//! for that one request. Panics are caught in both places a handler can
//! raise them: while building its future, and while the future is polled.
//!
//! # Example
//!
//! ```rust
//! use switchyard_core::{Response, ResponseExt};
//! use switchyard_middleware::{Fault, Recovery};
//! use http::StatusCode;
//!
//! // Default: log the panic and answer 500 "Internal server error".
//! let recovery = Recovery::new();
//!
//! // Custom: answer 503 and keep the message out of the body.
//! let custom = Recovery::with_action(|fault: &Fault| {
//!     eprintln!("{fault}");
//!     Response::text(StatusCode::SERVICE_UNAVAILABLE, "try again later")
//! });
//! # let _ = (recovery, custom);
//! ```

use std::any::Any;
use std::backtrace::Backtrace;
use std::fmt;
use std::future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures_util::FutureExt;
use http::{Method, StatusCode, Uri};
use switchyard_core::{BoxFuture, BoxedHandler, Handler, Request, Response, ResponseExt};

use crate::middleware::Middleware;

/// Body of the default recovery response.
pub const INTERNAL_SERVER_ERROR_BODY: &str = "Internal server error";

type RecoveryAction = dyn Fn(&Fault) -> Response + Send + Sync;

/// A panic caught while handling one request.
#[derive(Debug)]
pub struct Fault {
    method: Method,
    uri: Uri,
    message: String,
    backtrace: Backtrace,
}

impl Fault {
    fn new(method: Method, uri: Uri, payload: &(dyn Any + Send)) -> Self {
        Self {
            method,
            uri,
            message: panic_message(payload),
            backtrace: Backtrace::force_capture(),
        }
    }

    /// Method of the faulted request.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// URI of the faulted request, as this middleware saw it.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The panic payload, if it was a string.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Stack context captured where the panic was caught.
    ///
    /// Always captured, whatever `RUST_BACKTRACE` says.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "panic while handling {} {}: {}",
            self.method, self.uri, self.message
        )
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

/// Logs the fault and answers `500 Internal server error`.
fn default_action(fault: &Fault) -> Response {
    tracing::error!(
        method = %fault.method(),
        uri = %fault.uri(),
        panic = %fault.message(),
        backtrace = %fault.backtrace(),
        "Caught panic while handling request"
    );
    Response::text(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR_BODY)
}

/// Middleware that contains panics to the request that raised them.
#[derive(Clone)]
pub struct Recovery {
    action: Arc<RecoveryAction>,
}

impl Recovery {
    /// Recovery with the default action.
    #[must_use]
    pub fn new() -> Self {
        Self {
            action: Arc::new(default_action),
        }
    }

    /// Recovery that builds the response with `action`.
    ///
    /// The action replaces the default entirely, logging included.
    pub fn with_action<F>(action: F) -> Self
    where
        F: Fn(&Fault) -> Response + Send + Sync + 'static,
    {
        Self {
            action: Arc::new(action),
        }
    }
}

impl Default for Recovery {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recovery").finish_non_exhaustive()
    }
}

impl Middleware for Recovery {
    fn name(&self) -> &'static str {
        "recovery"
    }

    fn wrap(&self, inner: BoxedHandler) -> BoxedHandler {
        Arc::new(RecoveryHandler {
            inner,
            action: Arc::clone(&self.action),
        })
    }
}

struct RecoveryHandler {
    inner: BoxedHandler,
    action: Arc<RecoveryAction>,
}

impl Handler for RecoveryHandler {
    fn call(&self, request: Request) -> BoxFuture<'static, Response> {
        let method = request.method().clone();
        let uri = request.uri().clone();
        let action = Arc::clone(&self.action);

        match panic::catch_unwind(AssertUnwindSafe(|| self.inner.call(request))) {
            Ok(future) => Box::pin(async move {
                match AssertUnwindSafe(future).catch_unwind().await {
                    Ok(response) => response,
                    Err(payload) => action(&Fault::new(method, uri, &*payload)),
                }
            }),
            Err(payload) => Box::pin(future::ready(action(&Fault::new(method, uri, &*payload)))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http_body_util::{BodyExt, Full};
    use parking_lot::Mutex;
    use std::backtrace::BacktraceStatus;
    use switchyard_core::{boxed, handler_fn};
    use tracing_subscriber::fmt::MakeWriter;

    fn request(path: &str) -> Request {
        http::Request::builder()
            .method(Method::POST)
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    async fn body(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    struct PanicsOnCall;

    impl Handler for PanicsOnCall {
        fn call(&self, _request: Request) -> BoxFuture<'static, Response> {
            panic!("before the future exists")
        }
    }

    fn panics_when_polled() -> BoxedHandler {
        boxed(handler_fn(|req: Request| async move {
            if req.uri().path() == "/boom" {
                panic!("while polling {}", req.uri().path());
            }
            Response::text(StatusCode::OK, "fine")
        }))
    }

    #[tokio::test]
    async fn test_default_action_answers_500() {
        let handler = Recovery::new().wrap(panics_when_polled());
        let response = handler.call(request("/boom")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(response).await, INTERNAL_SERVER_ERROR_BODY);
    }

    #[tokio::test]
    async fn test_panic_before_future_is_caught() {
        let handler = Recovery::new().wrap(boxed(PanicsOnCall));
        let response = handler.call(request("/")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_no_panic_passes_through() {
        let handler = Recovery::new().wrap(panics_when_polled());
        let response = handler.call(request("/calm")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(response).await, "fine");
    }

    #[tokio::test]
    async fn test_custom_action_sees_fault() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let recovery = Recovery::with_action(move |fault: &Fault| {
            *sink.lock() = Some((
                fault.method().clone(),
                fault.uri().path().to_string(),
                fault.message().to_string(),
            ));
            Response::empty(StatusCode::SERVICE_UNAVAILABLE)
        });

        let response = recovery.wrap(panics_when_polled()).call(request("/boom")).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            seen.lock().clone(),
            Some((
                Method::POST,
                "/boom".to_string(),
                "while polling /boom".to_string()
            ))
        );
    }

    /// Collects everything a `fmt` subscriber writes.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_default_action_logs_one_error_with_stack() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(captured.clone())
            .finish();

        let handler = Recovery::new().wrap(panics_when_polled());
        let response = tracing::subscriber::with_default(subscriber, || {
            handler.call(request("/boom")).now_or_never()
        });
        assert_eq!(
            response.map(|r| r.status()),
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        );

        let output = String::from_utf8(captured.0.lock().clone()).unwrap();
        let events: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(events.len(), 1, "{output}");

        let event = &events[0];
        assert_eq!(event["level"], "ERROR");
        assert_eq!(event["fields"]["panic"], "while polling /boom");
        assert_eq!(event["fields"]["uri"], "/boom");
        let backtrace = event["fields"]["backtrace"].as_str().unwrap();
        assert!(!backtrace.is_empty());
        assert_ne!(backtrace, "disabled backtrace");
    }

    #[test]
    fn test_fault_captures_backtrace_without_env() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        let fault = Fault::new(Method::GET, Uri::from_static("/"), &*payload);
        assert_ne!(fault.backtrace().status(), BacktraceStatus::Disabled);
    }

    #[test]
    fn test_panic_message_payloads() {
        let text: Box<dyn Any + Send> = Box::new("static");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let other: Box<dyn Any + Send> = Box::new(7_u8);

        assert_eq!(panic_message(&*text), "static");
        assert_eq!(panic_message(&*owned), "owned");
        assert_eq!(panic_message(&*other), "Box<dyn Any>");
    }

    #[test]
    fn test_fault_display() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        let fault = Fault::new(Method::GET, Uri::from_static("/x?y=1"), &*payload);
        assert_eq!(fault.to_string(), "panic while handling GET /x?y=1: boom");
    }
}
