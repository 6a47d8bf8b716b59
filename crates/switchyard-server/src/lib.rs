//! # Switchyard Server
//!
//! A minimal HTTP/1.1 host for a finalized Switchyard router, or any other
//! [`Handler`](switchyard_core::Handler).
//!
//! Request bodies are read fully before the handler runs. Shutdown stops
//! accepting, lets open connections finish their current request, and waits
//! up to the configured timeout for them to close.
//!
//! ```rust,no_run
//! use switchyard::prelude::*;
//! use switchyard_server::{Server, ServerConfig, ShutdownSignal};
//! use http::StatusCode;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let router = Router::builder()
//!     .middleware(AccessLog::new())
//!     .middleware(Recovery::new())
//!     .handle_fn("GET /ping", |_req| async { Response::text(StatusCode::OK, "pong") })
//!     .finalize()?;
//!
//! let shutdown = ShutdownSignal::with_os_signals();
//! Server::new(ServerConfig::default(), router)
//!     .run_with_shutdown(shutdown)
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/switchyard-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
mod server;
pub mod shutdown;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use error::ServerError;
pub use server::{serve, Server};
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
