//! # Switchyard
//!
//! **Request dispatch composition for `http`-based services**
//!
//! Switchyard collects three kinds of configuration on a builder and folds
//! them, once, into a single immutable handler:
//!
//! - **Patterns**: `"[METHOD ]/path/{param}"` strings bound to handlers
//! - **Mounts**: independently built handlers delegated to under a path
//!   prefix, with the prefix stripped
//! - **Middleware**: handler wrappers, the first added running outermost
//!
//! A finalized [`Router`] is itself a [`Handler`], so routers nest.
//!
//! ## Quick Start
//!
//! ```rust
//! use switchyard::prelude::*;
//! use http::StatusCode;
//!
//! # tokio_test::block_on(async {
//! let api = Router::builder()
//!     .handle_fn("GET /hello/{name}", |req| async move {
//!         let name = req.param("name").unwrap_or("world").to_string();
//!         Response::text(StatusCode::OK, format!("hello {name}"))
//!     })
//!     .finalize()?;
//!
//! let app = Router::builder()
//!     .middleware(AccessLog::new())
//!     .middleware(Recovery::new())
//!     .mount("/api/", api)
//!     .finalize()?;
//!
//! let request = http::Request::get("/api/hello/gopher")
//!     .body(Default::default())
//!     .unwrap();
//! let response = app.call(request).await;
//! assert_eq!(response.status(), StatusCode::OK);
//! # Ok::<(), ConfigError>(())
//! # }).unwrap();
//! ```
//!
//! ## Architecture
//!
//! ```text
//!  RouterBuilder                         Router (finalized)
//!  ─────────────                         ──────────────────
//!  patterns ──┐                          m1
//!             ├─► pattern matcher ──►     └─ m2
//!  mounts ────┘   (Dispatcher)                └─ …
//!                                                └─ Dispatcher ─► handler
//!  middleware ─────── fold ─────────►                         └─► mount ─► strip prefix ─► sub-router
//! ```
//!
//! Configuration mistakes (malformed or duplicate patterns, bad mount
//! prefixes) are reported by [`RouterBuilder::finalize`] as a
//! [`ConfigError`]; a router that finalized successfully never fails to
//! dispatch. Unmatched paths answer `404`, paths matched only under other
//! methods answer `405` with an `Allow` header.

#![doc(html_root_url = "https://docs.rs/switchyard/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod builder;
mod dispatch;
mod error;
mod mount;
mod table;

pub use builder::{Router, RouterBuilder};
pub use dispatch::{METHOD_NOT_ALLOWED_BODY, NOT_FOUND_BODY};
pub use error::ConfigError;

// Re-export handler types
pub use switchyard_core as core;

// Re-export middleware types
pub use switchyard_middleware as middleware;

// Re-export the pattern matcher
pub use switchyard_router as router;

pub use switchyard_core::{BoxedHandler, Handler, Request, Response};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use switchyard::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{ConfigError, Router, RouterBuilder};

    pub use switchyard_core::{
        handler_fn, BoxedHandler, Handler, OriginalUri, Request, RequestExt, Response,
        ResponseExt,
    };

    pub use switchyard_middleware::{
        from_fn, wrap_fn, AccessLog, AccessRecord, Fault, Middleware, Next, Recovery,
    };
}
