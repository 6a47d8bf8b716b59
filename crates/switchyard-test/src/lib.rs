//! # Switchyard Test
//!
//! In-memory testing for Switchyard handlers and routers. Requests go
//! through the complete middleware chain without binding a port.
//!
//! ## Example
//!
//! ```rust
//! use http::StatusCode;
//! use switchyard_core::{handler_fn, Response, ResponseExt};
//! use switchyard_test::TestClient;
//!
//! # tokio_test::block_on(async {
//! let client = TestClient::new(handler_fn(|_req| async {
//!     Response::text(StatusCode::CREATED, "created")
//! }));
//!
//! client
//!     .post("/users")
//!     .json(&serde_json::json!({ "name": "Alice" }))
//!     .send()
//!     .await
//!     .assert_status(StatusCode::CREATED)
//!     .assert_body_eq("created");
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/switchyard-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::TestRequest;
pub use response::TestResponse;
