//! IREAL backend: HTTP edge for ideas, plans, calendar, publishing and
//! AI generation.
//!
//! - `domain`: types, ports and the local ideas service.
//! - `inbound`: actix handlers and extractors.
//! - `outbound`: gateway, provider, database and in-memory adapters.
//! - `server`: settings, strategy selection and app assembly.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use middleware::RequestTrace;
