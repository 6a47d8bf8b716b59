//! # Switchyard Middleware
//!
//! Middleware for the Switchyard composition engine.
//!
//! A middleware transforms one handler into another. The router folds its
//! [`MiddlewareStack`] around the dispatcher once, at finalize time, so the
//! first middleware added becomes the outermost layer:
//!
//! ```text
//! Request → m1 → m2 → … → mn → Dispatcher
//!                                  ↓
//! Response ← m1 ← m2 ← … ← mn ←────┘
//! ```
//!
//! ## Bundled Policies
//!
//! | Middleware    | Purpose                                          |
//! |---------------|--------------------------------------------------|
//! | [`Recovery`]  | Turns a panic into a 500 for that request only   |
//! | [`AccessLog`] | Logs status, method, path and elapsed time       |
//!
//! Each has one configuration slot (a recovery action / an emitter) with a
//! built-in default.
//!
//! ## Example
//!
//! ```
//! use switchyard_middleware::{AccessLog, MiddlewareStack, Recovery};
//!
//! let mut stack = MiddlewareStack::new();
//! stack.push(AccessLog::new());
//! stack.push(Recovery::new());
//! assert_eq!(stack.names(), vec!["access_log", "recovery"]);
//! ```

#![doc(html_root_url = "https://docs.rs/switchyard-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod access_log;
pub mod middleware;
pub mod recovery;
pub mod stack;

pub use access_log::{AccessLog, AccessRecord};
pub use middleware::{from_fn, wrap_fn, FnMiddleware, Middleware, Next, WrapFn};
pub use recovery::{Fault, Recovery, INTERNAL_SERVER_ERROR_BODY};
pub use stack::MiddlewareStack;
