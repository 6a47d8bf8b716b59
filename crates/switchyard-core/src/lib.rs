//! # Switchyard Core
//!
//! The handler model every other Switchyard crate builds on.
//!
//! - [`Handler`] - the one-method capability all request processors share
//! - [`BoxedHandler`] - `Arc<dyn Handler>`, the type the router stores
//! - [`handler_fn`] - adapts an async closure
//! - [`Request`] / [`Response`] - `http` types with a buffered body
//! - [`RequestExt`] - path parameters and the pre-mount URI

#![doc(html_root_url = "https://docs.rs/switchyard-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod ext;
mod handler;
mod types;

pub use ext::{OriginalUri, RequestExt};
pub use handler::{boxed, handler_fn, BoxedHandler, Handler, HandlerFn};
pub use types::{BoxFuture, Request, Response, ResponseExt};

pub use switchyard_router::Params;
