//! Request middleware.
//!
//! Purpose: request lifecycle concerns that wrap every handler, currently
//! request correlation and access logging.

pub mod request_trace;

pub use request_trace::RequestTrace;
