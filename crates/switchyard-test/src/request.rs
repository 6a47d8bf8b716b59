//! Test request building.

use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use http_body_util::Full;
use serde::Serialize;
use switchyard_core::Request;

use crate::error::TestError;

/// Builder for a request handed to a [`TestClient`](crate::TestClient).
///
/// Invalid header names or values do not panic while chaining; the first
/// one is reported by [`build`](Self::build).
///
/// # Example
///
/// ```rust
/// use switchyard_test::TestRequest;
///
/// let request = TestRequest::get("/users?page=2")
///     .header("x-request-id", "12345")
///     .build()
///     .unwrap();
/// assert_eq!(request.uri().query(), Some("page=2"));
/// ```
#[must_use]
#[derive(Debug)]
pub struct TestRequest {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Bytes,
    error: Option<TestError>,
}

impl TestRequest {
    /// Creates a request builder with any method.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            error: None,
        }
    }

    /// Creates a GET request builder.
    pub fn get(uri: impl AsRef<str>) -> Self {
        Self::new(Method::GET, uri)
    }

    /// Creates a POST request builder.
    pub fn post(uri: impl AsRef<str>) -> Self {
        Self::new(Method::POST, uri)
    }

    /// Creates a PUT request builder.
    pub fn put(uri: impl AsRef<str>) -> Self {
        Self::new(Method::PUT, uri)
    }

    /// Creates a PATCH request builder.
    pub fn patch(uri: impl AsRef<str>) -> Self {
        Self::new(Method::PATCH, uri)
    }

    /// Creates a DELETE request builder.
    pub fn delete(uri: impl AsRef<str>) -> Self {
        Self::new(Method::DELETE, uri)
    }

    /// Creates a HEAD request builder.
    pub fn head(uri: impl AsRef<str>) -> Self {
        Self::new(Method::HEAD, uri)
    }

    /// Sets a header, replacing any earlier value.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let (name, value) = (name.as_ref(), value.as_ref());
        match (
            HeaderName::try_from(name),
            HeaderValue::try_from(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => self.error = Some(TestError::InvalidHeader(format!("{name}: {value}"))),
        }
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body and `Content-Type: application/json`.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.body = Bytes::from(bytes),
            Err(err) => {
                self.error.get_or_insert(TestError::Json(err));
            }
        }
        self.content_type("application/json")
    }

    /// Builds the request.
    pub fn build(self) -> Result<Request, TestError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let uri: Uri = self.uri.parse().map_err(|source| TestError::InvalidUri {
            uri: self.uri.clone(),
            source,
        })?;

        let mut request = http::Request::builder()
            .method(self.method)
            .uri(uri)
            .body(Full::new(self.body))?;
        *request.headers_mut() = self.headers;
        Ok(request)
    }
}
