//! The innermost handler: pattern lookup and delegation.

use std::future;
use std::sync::Arc;

use http::header::{HeaderValue, ALLOW};
use http::{Method, StatusCode};
use switchyard_core::{BoxFuture, BoxedHandler, Handler, Request, Response, ResponseExt};
use switchyard_router::{MatchError, Router as Routes};
use tracing::debug;

/// Body of the response for an unmatched path.
pub const NOT_FOUND_BODY: &str = "404 page not found";

/// Body of the response for a path matched under other methods only.
pub const METHOD_NOT_ALLOWED_BODY: &str = "Method Not Allowed";

/// Routes each request to the handler registered for its method and path.
///
/// Path parameters of the winning pattern are stored in the request's
/// extensions before the handler runs.
pub(crate) struct Dispatcher {
    routes: Routes<BoxedHandler>,
}

impl Dispatcher {
    pub(crate) fn new(routes: Routes<BoxedHandler>) -> Self {
        Self { routes }
    }
}

impl Handler for Dispatcher {
    fn call(&self, mut request: Request) -> BoxFuture<'static, Response> {
        match self.routes.at(request.method(), request.uri().path()) {
            Ok(matched) => {
                let handler = Arc::clone(matched.value);
                request.extensions_mut().insert(matched.params);
                handler.call(request)
            }
            Err(MatchError::NotFound) => {
                debug!(
                    method = %request.method(),
                    path = %request.uri().path(),
                    "No route matched"
                );
                Box::pin(future::ready(not_found()))
            }
            Err(MatchError::MethodNotAllowed { allowed }) => {
                debug!(
                    method = %request.method(),
                    path = %request.uri().path(),
                    allowed = ?allowed,
                    "Method not allowed"
                );
                Box::pin(future::ready(method_not_allowed(&allowed)))
            }
        }
    }
}

pub(crate) fn not_found() -> Response {
    Response::error(StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

fn method_not_allowed(allowed: &[Method]) -> Response {
    let mut response = Response::error(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_BODY);
    let allow = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(ALLOW, value);
    }
    response
}
