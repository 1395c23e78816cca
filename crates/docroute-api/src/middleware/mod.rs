//! # Middleware Stack
//!
//! - [`metrics`]: in-process request and submission counters.
//!
//! Request tracing uses `tower_http::trace::TraceLayer` directly in
//! [`crate::app`].

pub mod metrics;
