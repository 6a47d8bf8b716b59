//! Request and response types shared by every handler.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use http_body_util::Full;

/// The HTTP request type handlers receive.
///
/// This is a standard `http::Request` with a fully buffered body.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type handlers return.
pub type Response = http::Response<Full<Bytes>>;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Constructors for the plain responses the dispatcher and policies produce.
pub trait ResponseExt {
    /// A `text/plain` response with the given status and body.
    fn text<B: Into<Bytes>>(status: StatusCode, body: B) -> Response;

    /// A `text/plain` response whose body is `message` followed by a newline.
    ///
    /// This is the shape of Go's `http.Error`, which the built-in 404, 405
    /// and 500 responses follow.
    fn error(status: StatusCode, message: &str) -> Response;

    /// A response with the given status and an empty body.
    fn empty(status: StatusCode) -> Response;
}

impl ResponseExt for Response {
    fn text<B: Into<Bytes>>(status: StatusCode, body: B) -> Response {
        let mut response = http::Response::new(Full::new(body.into()));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
        response
    }

    fn error(status: StatusCode, message: &str) -> Response {
        Self::text(status, format!("{message}\n"))
    }

    fn empty(status: StatusCode) -> Response {
        let mut response = http::Response::new(Full::new(Bytes::new()));
        *response.status_mut() = status;
        response
    }
}
