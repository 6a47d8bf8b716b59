//! Access log middleware.
//!
//! Emits one record per request after the inner chain has produced its
//! response: status code, method, path, and elapsed time.
//!
//! Place it outside [`Recovery`](crate::Recovery) to log faulted requests as
//! 500s; inside it, a panic skips the log line.
//!
//! # Example
//!
//! ```rust
//! use switchyard_middleware::{AccessLog, AccessRecord};
//!
//! // Default: `tracing::info!` with structured fields.
//! let log = AccessLog::new();
//!
//! // Custom: any sink.
//! let custom = AccessLog::with_emitter(|record: &AccessRecord| println!("{record}"));
//! # let _ = (log, custom);
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http::{Method, StatusCode};
use switchyard_core::{BoxFuture, BoxedHandler, Handler, Request, Response};

use crate::middleware::Middleware;

type Emitter = dyn Fn(&AccessRecord) + Send + Sync;

/// One access log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRecord {
    /// Status of the response; 200 unless the handler chose another.
    pub status: StatusCode,
    /// Request method.
    pub method: Method,
    /// Request path as this middleware saw it.
    pub path: String,
    /// Time from entering the middleware to the response being ready.
    pub elapsed: Duration,
}

impl fmt::Display for AccessRecord {
    /// `"200 GET /ping 1.25ms"`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {:?}",
            self.status.as_u16(),
            self.method,
            self.path,
            self.elapsed
        )
    }
}

fn default_emitter(record: &AccessRecord) {
    tracing::info!(
        status = record.status.as_u16(),
        method = %record.method,
        path = %record.path,
        elapsed_ms = record.elapsed.as_secs_f64() * 1000.0,
        "{record}"
    );
}

/// Middleware that logs every request it sees.
#[derive(Clone)]
pub struct AccessLog {
    emitter: Arc<Emitter>,
}

impl AccessLog {
    /// Access log writing to `tracing` at INFO.
    #[must_use]
    pub fn new() -> Self {
        Self {
            emitter: Arc::new(default_emitter),
        }
    }

    /// Access log handing each record to `emitter`.
    pub fn with_emitter<F>(emitter: F) -> Self
    where
        F: Fn(&AccessRecord) + Send + Sync + 'static,
    {
        Self {
            emitter: Arc::new(emitter),
        }
    }
}

impl Default for AccessLog {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AccessLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessLog").finish_non_exhaustive()
    }
}

impl Middleware for AccessLog {
    fn name(&self) -> &'static str {
        "access_log"
    }

    fn wrap(&self, inner: BoxedHandler) -> BoxedHandler {
        Arc::new(AccessLogHandler {
            inner,
            emitter: Arc::clone(&self.emitter),
        })
    }
}

struct AccessLogHandler {
    inner: BoxedHandler,
    emitter: Arc<Emitter>,
}

impl Handler for AccessLogHandler {
    fn call(&self, request: Request) -> BoxFuture<'static, Response> {
        let start = Instant::now();
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let emitter = Arc::clone(&self.emitter);
        let future = self.inner.call(request);

        Box::pin(async move {
            let response = future.await;
            let record = AccessRecord {
                status: response.status(),
                method,
                path,
                elapsed: start.elapsed(),
            };
            emitter(&record);
            response
        })
    }
}
