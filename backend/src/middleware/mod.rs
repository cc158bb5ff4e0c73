//! Request middleware.
//!
//! Purpose: define middleware for request lifecycle concerns such as tracing.
//! The access gate lives with the HTTP adapter because it needs the handler
//! state.

pub mod trace;

pub use trace::Trace;
