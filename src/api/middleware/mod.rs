//! HTTP middleware for request processing.
//!
//! Provides request tracing and CORS for browser clients.

pub mod cors;
pub mod tracing;
