//! Buffered responses and assertions on them.

use std::fmt;

use bytes::Bytes;
use http::response::Parts;
use http::{header, HeaderMap, Method, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use switchyard_core::Response;

use crate::error::TestError;

/// A handler's response with its body read into memory.
///
/// The `assert_*` methods return `&Self` so checks chain:
///
/// ```rust
/// # use switchyard_test::TestResponse;
/// # use http::StatusCode;
/// # fn check(response: &TestResponse) {
/// response
///     .assert_status(StatusCode::OK)
///     .assert_header("content-type", "text/plain; charset=utf-8")
///     .assert_body_eq("pong");
/// # }
/// ```
pub struct TestResponse {
    parts: Parts,
    body: Bytes,
}

impl TestResponse {
    /// Reads `response`'s body to the end.
    pub async fn from_http(response: Response) -> Self {
        let (parts, body) = response.into_parts();
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(never) => match never {},
        };
        Self { parts, body }
    }

    /// Status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.parts.status
    }

    /// All response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// A header as text; `None` if absent or not visible ASCII.
    #[must_use]
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name)?.to_str().ok()
    }

    /// `Content-Type`, if set.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header_str(header::CONTENT_TYPE.as_str())
    }

    /// Methods listed in the `Allow` header of a 405, in header order.
    #[must_use]
    pub fn allow(&self) -> Vec<Method> {
        self.header_str(header::ALLOW.as_str())
            .map(|value| {
                value
                    .split(',')
                    .filter_map(|m| Method::from_bytes(m.trim().as_bytes()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body decoded as UTF-8.
    pub fn text(&self) -> Result<String, TestError> {
        std::str::from_utf8(&self.body)
            .map(str::to_owned)
            .map_err(|e| TestError::BodyRead(format!("body is not UTF-8: {e}")))
    }

    /// Body parsed as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        serde_json::from_slice(&self.body).map_err(TestError::from)
    }

    /// # Panics
    ///
    /// Panics unless the status is `expected`.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status(),
            expected,
            "unexpected status; body: {:?}",
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    /// # Panics
    ///
    /// Panics unless header `name` is present with value `expected`.
    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        match self.header_str(name) {
            Some(actual) => assert_eq!(actual, expected, "header {name:?}"),
            None => panic!("header {name:?} missing; have {:?}", self.headers()),
        }
        self
    }

    /// # Panics
    ///
    /// Panics unless the body is exactly `expected`.
    pub fn assert_body_eq(&self, expected: impl AsRef<str>) -> &Self {
        assert_eq!(self.body_text(), expected.as_ref(), "body");
        self
    }

    /// # Panics
    ///
    /// Panics unless the body contains `needle`.
    pub fn assert_body_contains(&self, needle: impl AsRef<str>) -> &Self {
        let body = self.body_text();
        let needle = needle.as_ref();
        assert!(body.contains(needle), "body {body:?} lacks {needle:?}");
        self
    }

    fn body_text(&self) -> String {
        self.text().unwrap_or_else(|e| panic!("{e}"))
    }
}

impl fmt::Debug for TestResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestResponse")
            .field("status", &self.parts.status)
            .field("headers", &self.parts.headers)
            .field("body", &String::from_utf8_lossy(&self.body))
            .finish()
    }
}
