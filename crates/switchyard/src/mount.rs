//! Prefix-stripping delegation to mounted handlers.
//!
//! A mount at `/api/` registers the subtree pattern `/api/` and delegates
//! every request under it to the mounted handler with `/api` removed from
//! the path:
//!
//! | Incoming        | Mounted handler sees |
//! |-----------------|----------------------|
//! | `/api/ping`     | `/ping`              |
//! | `/api/`         | `/`                  |
//! | `/api`          | `/`                  |
//! | `/api/u?id=7`   | `/u?id=7`            |

use std::future;
use std::sync::Arc;

use http::uri::PathAndQuery;
use http::Uri;
use switchyard_core::{BoxFuture, BoxedHandler, Handler, OriginalUri, Request, Response};
use switchyard_router::Router as Routes;
use tracing::debug;

use crate::dispatch::not_found;
use crate::error::ConfigError;

/// Validates `prefix` and returns `(stripped, pattern)`.
///
/// `stripped` is the prefix without its trailing `/`; `pattern` is the
/// subtree pattern registered for it.
pub(crate) fn mount_pattern(prefix: &str) -> Result<(String, String), ConfigError> {
    let reject = |reason| ConfigError::MountPrefix {
        prefix: prefix.to_string(),
        reason,
    };

    if !prefix.starts_with('/') {
        return Err(reject("prefix must start with '/'"));
    }
    if prefix.contains(char::is_whitespace) {
        return Err(reject("prefix must not carry a method or whitespace"));
    }
    if prefix.contains(['{', '}', '*']) {
        return Err(reject("prefix must not contain parameters or wildcards"));
    }

    let stripped = prefix.strip_suffix('/').unwrap_or(prefix);
    Ok((stripped.to_string(), format!("{stripped}/")))
}

/// Registers `handler` under `prefix` in `routes`.
pub(crate) fn register(
    routes: &mut Routes<BoxedHandler>,
    prefix: String,
    handler: BoxedHandler,
) -> Result<(), ConfigError> {
    let (stripped, pattern) = mount_pattern(&prefix)?;

    let adapter: BoxedHandler = Arc::new(StripPrefix {
        prefix: stripped,
        inner: handler,
    });
    if let Err(source) = routes.insert(&pattern, adapter) {
        return Err(ConfigError::Mount { prefix, source });
    }

    debug!(prefix = %prefix, pattern = %pattern, "Mounted handler");
    Ok(())
}

/// Removes a literal path prefix before delegating.
struct StripPrefix {
    prefix: String,
    inner: BoxedHandler,
}

impl Handler for StripPrefix {
    fn call(&self, mut request: Request) -> BoxFuture<'static, Response> {
        let Some(uri) = strip_prefix(request.uri(), &self.prefix) else {
            debug!(
                path = %request.uri().path(),
                prefix = %self.prefix,
                "Path does not start with mount prefix"
            );
            return Box::pin(future::ready(not_found()));
        };

        if request.extensions().get::<OriginalUri>().is_none() {
            let original = OriginalUri(request.uri().clone());
            request.extensions_mut().insert(original);
        }
        *request.uri_mut() = uri;

        self.inner.call(request)
    }
}

/// Returns `uri` with `prefix` removed from its path, keeping the query.
///
/// `None` if the path does not literally start with `prefix`.
fn strip_prefix(uri: &Uri, prefix: &str) -> Option<Uri> {
    let rest = uri.path().strip_prefix(prefix)?;
    let path = if rest.is_empty() { "/" } else { rest };

    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}
