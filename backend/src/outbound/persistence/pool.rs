//! Shared PostgreSQL pool for the ideas store.
//!
//! Connections are `diesel-async` connections managed by bb8. The
//! connection string is held as a zeroizing secret because it usually
//! embeds credentials.

use std::fmt;
use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Pooled connection handed to repository methods.
pub type PgConn<'a> = PooledConnection<'a, AsyncPgConnection>;

/// Failure to open the pool or to check a connection out of it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became available before the checkout timeout.
    #[error("database checkout failed: {message}")]
    Checkout { message: String },
    /// The pool could not be created.
    #[error("database pool unavailable: {message}")]
    Build { message: String },
}

impl PoolError {
    #[must_use]
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Connection counts and checkout limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSizing {
    pub max_connections: u32,
    pub idle_connections: Option<u32>,
    pub checkout_timeout: Duration,
}

impl Default for PoolSizing {
    fn default() -> Self {
        Self {
            max_connections: 10,
            idle_connections: Some(1),
            checkout_timeout: Duration::from_secs(5),
        }
    }
}

/// Where to connect and how many connections to keep.
#[derive(Clone)]
pub struct PoolConfig {
    url: Zeroizing<String>,
    sizing: PoolSizing,
}

impl PoolConfig {
    /// Default sizing: ten connections, one kept idle, five second checkout.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Zeroizing::new(url.into()),
            sizing: PoolSizing::default(),
        }
    }

    #[must_use]
    pub fn sized(mut self, sizing: PoolSizing) -> Self {
        self.sizing = sizing;
        self
    }

    #[must_use]
    pub fn sizing(&self) -> PoolSizing {
        self.sizing
    }
}

impl fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfig")
            .field("url", &"<redacted>")
            .field("sizing", &self.sizing)
            .finish()
    }
}

/// Cloneable handle over the bb8 pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Open the pool. bb8 establishes the idle connections eagerly, so an
    /// unreachable database fails here rather than on the first request.
    ///
    /// # Errors
    ///
    /// [`PoolError::Build`] when the pool cannot be created.
    pub async fn connect(config: PoolConfig) -> Result<Self, PoolError> {
        let PoolConfig { url, sizing } = config;
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(url.as_str());
        let inner = Pool::builder()
            .max_size(sizing.max_connections)
            .min_idle(sizing.idle_connections)
            .connection_timeout(sizing.checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;
        info!(
            max_connections = sizing.max_connections,
            "database pool ready"
        );
        Ok(Self { inner })
    }

    /// Check a connection out for the duration of one repository call.
    ///
    /// # Errors
    ///
    /// [`PoolError::Checkout`] when the checkout timeout elapses.
    pub async fn checkout(&self) -> Result<PgConn<'_>, PoolError> {
        self.inner.get().await.map_err(|err| {
            debug!(error = %err, "database checkout failed");
            PoolError::checkout(err.to_string())
        })
    }
}
