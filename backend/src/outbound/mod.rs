//! Outbound adapters implementing domain ports.
//!
//! - **service**: forwarding to the upstream content service
//! - **generation**: OpenAI-compatible text generation
//! - **persistence**: PostgreSQL idea storage via Diesel
//! - **memory**: process-local idea storage

pub mod generation;
pub mod memory;
pub mod persistence;
pub mod service;
