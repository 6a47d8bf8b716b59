//! Request extensions written by the dispatcher.

use http::Uri;
use switchyard_router::Params;

/// The request URI as it arrived, before any mount stripped a prefix.
///
/// Inserted by the first mount a request passes through; nested mounts
/// leave it untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalUri(pub Uri);

/// Accessors for values the dispatcher stores on a request.
///
/// # Example
///
/// ```rust
/// use switchyard_core::RequestExt;
/// use switchyard_router::Params;
///
/// let mut request = http::Request::new(());
/// request.extensions_mut().insert(Params::from_iter([("name", "gopher")]));
///
/// assert_eq!(request.param("name"), Some("gopher"));
/// assert_eq!(request.param("missing"), None);
/// ```
pub trait RequestExt {
    /// Path parameters bound by the pattern that matched, if any.
    fn params(&self) -> Option<&Params>;

    /// The value bound to the named path parameter.
    fn param(&self, name: &str) -> Option<&str>;

    /// The URI before any mount rewrote it, or the current URI.
    fn original_uri(&self) -> &Uri;
}

impl<B> RequestExt for http::Request<B> {
    fn params(&self) -> Option<&Params> {
        self.extensions().get::<Params>()
    }

    fn param(&self, name: &str) -> Option<&str> {
        self.params().and_then(|params| params.get(name))
    }

    fn original_uri(&self) -> &Uri {
        self.extensions()
            .get::<OriginalUri>()
            .map_or_else(|| self.uri(), |original| &original.0)
    }
}
