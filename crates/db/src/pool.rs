//! Connection pool — the persistence gateway every handler draws from.
//!
//! The pool is built on sqlx's `Any` driver so the same statements run
//! against MySQL in production and SQLite in tests.

use std::time::Duration;

use sqlx::any::{AnyConnectOptions, AnyPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyPool, ConnectOptions, Connection};
use tracing::info;

use crate::{DatabaseConfig, DbError};

/// How long the eager [`connect`] waits for its first connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Type alias for the shared pool used across the whole application.
pub type DbPool = AnyPool;

/// A connection checked out of the pool for one unit of work.
///
/// Returned to the pool when dropped, on every exit path.
pub type DbConn = PoolConnection<Any>;

fn any_options(config: &DatabaseConfig) -> Result<AnyConnectOptions, DbError> {
    sqlx::any::install_default_drivers();
    let url = config.connect_options().to_url_lossy();
    Ok(AnyConnectOptions::from_url(&url)?)
}

/// Create a pool for `config` without opening any connection yet.
///
/// Connection failures surface later, per request, from [`acquire`].
pub fn connect_lazy(config: &DatabaseConfig, max_connections: u32) -> Result<DbPool, DbError> {
    info!(
        "Preparing database pool for {}:{} (max_connections={})",
        config.server, config.port, max_connections
    );
    let pool = AnyPoolOptions::new()
        .max_connections(max_connections)
        .test_before_acquire(true)
        .connect_lazy_with(any_options(config)?);
    Ok(pool)
}

/// Create a pool for `config` and open the first connection eagerly.
///
/// Gives up after [`CONNECT_TIMEOUT`].
pub async fn connect(config: &DatabaseConfig, max_connections: u32) -> Result<DbPool, DbError> {
    info!(
        "Attempting database connection to {}:{} (max_connections={})",
        config.server, config.port, max_connections
    );
    let pool = AnyPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(CONNECT_TIMEOUT)
        .test_before_acquire(true)
        .connect_with(any_options(config)?)
        .await
        .map_err(DbError::Unavailable)?;
    Ok(pool)
}

/// Check out a live connection.
pub async fn acquire(pool: &DbPool) -> Result<DbConn, DbError> {
    pool.acquire().await.map_err(DbError::Unavailable)
}

/// Acquire a connection and run an explicit liveness probe on it.
pub async fn ping(pool: &DbPool) -> Result<(), DbError> {
    let mut conn = acquire(pool).await?;
    conn.ping().await.map_err(DbError::Unavailable)?;
    Ok(())
}
