//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations translate between Diesel rows and domain
//! types. Row structs and table definitions stay private to this module.
//!
//! ```ignore
//! use ireal_backend::outbound::persistence::{DbPool, DieselIdeaRepository, PoolConfig};
//!
//! let pool = DbPool::connect(PoolConfig::new("postgres://localhost/ireal")).await?;
//! let repo = DieselIdeaRepository::new(pool);
//! ```

mod diesel_idea_repository;
mod models;
mod pool;
mod schema;

pub use diesel_idea_repository::DieselIdeaRepository;
pub use pool::{DbPool, PgConn, PoolConfig, PoolError, PoolSizing};
