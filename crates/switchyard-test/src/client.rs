//! In-memory test client.

use bytes::Bytes;
use http::Method;
use serde::Serialize;
use switchyard_core::{boxed, BoxedHandler, Handler, Request};

use crate::error::TestError;
use crate::request::TestRequest;
use crate::response::TestResponse;

/// Drives requests straight into a [`Handler`], without a socket.
///
/// A finalized router is a handler, so the usual setup is
/// `TestClient::new(router)`. Clones share the handler.
///
/// # Example
///
/// ```rust
/// use http::StatusCode;
/// use switchyard_core::{handler_fn, Response, ResponseExt};
/// use switchyard_test::TestClient;
///
/// # tokio_test::block_on(async {
/// let client = TestClient::new(handler_fn(|_req| async {
///     Response::text(StatusCode::OK, "OK")
/// }));
///
/// client
///     .get("/users")
///     .send()
///     .await
///     .assert_status(StatusCode::OK)
///     .assert_body_eq("OK");
/// # });
/// ```
#[must_use]
#[derive(Clone)]
pub struct TestClient {
    handler: BoxedHandler,
    defaults: Vec<(String, String)>,
}

macro_rules! verbs {
    ($($(#[$doc:meta])* $name:ident => $method:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
                self.request(Method::$method, uri)
            }
        )*
    };
}

impl TestClient {
    /// Creates a client that sends every request to `handler`.
    pub fn new<H: Handler>(handler: H) -> Self {
        Self {
            handler: boxed(handler),
            defaults: Vec::new(),
        }
    }

    /// Sets a header on every request this client builds; a per-request
    /// header of the same name replaces it.
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.defaults.push((name.into(), value.into()));
        self
    }

    /// Starts a request with any method.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        let request = self
            .defaults
            .iter()
            .fold(TestRequest::new(method, uri), |request, (name, value)| {
                request.header(name, value)
            });
        TestClientRequest {
            client: self,
            request,
        }
    }

    verbs! {
        /// Starts a GET request.
        get => GET;
        /// Starts a POST request.
        post => POST;
        /// Starts a PUT request.
        put => PUT;
        /// Starts a PATCH request.
        patch => PATCH;
        /// Starts a DELETE request.
        delete => DELETE;
        /// Starts a HEAD request.
        head => HEAD;
        /// Starts an OPTIONS request.
        options => OPTIONS;
    }

    /// Runs an already built request through the handler.
    pub async fn send_request(&self, request: Request) -> TestResponse {
        TestResponse::from_http(self.handler.call(request).await).await
    }
}

/// A [`TestRequest`] bound to the client that will send it.
#[must_use]
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    request: TestRequest,
}

impl TestClientRequest<'_> {
    /// See [`TestRequest::header`].
    pub fn header(self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.map(|request| request.header(name, value))
    }

    /// See [`TestRequest::content_type`].
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.map(|request| request.content_type(content_type))
    }

    /// See [`TestRequest::body`].
    pub fn body(self, body: impl Into<Bytes>) -> Self {
        self.map(|request| request.body(body))
    }

    /// See [`TestRequest::json`].
    pub fn json<T: Serialize>(self, value: &T) -> Self {
        self.map(|request| request.json(value))
    }

    fn map(self, f: impl FnOnce(TestRequest) -> TestRequest) -> Self {
        Self {
            client: self.client,
            request: f(self.request),
        }
    }

    /// Builds and sends the request.
    ///
    /// # Panics
    ///
    /// Panics if the request could not be built; use
    /// [`try_send`](Self::try_send) to get the error instead.
    pub async fn send(self) -> TestResponse {
        match self.try_send().await {
            Ok(response) => response,
            Err(err) => panic!("invalid test request: {err}"),
        }
    }

    /// Builds and sends the request, returning build failures.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        let request = self.request.build()?;
        Ok(self.client.send_request(request).await)
    }
}
