//! Connection pooling over deadpool-postgres.
//!
//! A process owns one [`Pool`] and checks a client out per request; the
//! checked-out client implements [`GenericClient`](crate::GenericClient),
//! so model operations run on it directly. Recycling uses the fast path
//! (no ping query), so a connection lost mid-flight surfaces on its next
//! checkout rather than at return time.

use crate::error::{DbError, DbResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::tls::{MakeTlsConnect, TlsConnect};
use tokio_postgres::{NoTls, Socket};

/// Connection limit used when the caller does not size the pool.
pub const DEFAULT_POOL_SIZE: usize = 16;

/// Create a pool from a database URL, without TLS.
///
/// Suited to local development and tests. A database that requires TLS
/// needs [`create_pool_with_tls`] instead.
///
/// # Example
///
/// ```ignore
/// let pool = jobdb::create_pool("postgres://localhost/jobdb")?;
/// let client = pool.get().await?;
/// ```
pub fn create_pool(database_url: &str) -> DbResult<Pool> {
    create_pool_with_config(database_url, DEFAULT_POOL_SIZE)
}

/// Create a pool with an explicit connection limit, without TLS.
pub fn create_pool_with_config(database_url: &str, max_size: usize) -> DbResult<Pool> {
    build_pool(database_url, NoTls, max_size)
}

/// Create a pool that connects through the given TLS connector.
pub fn create_pool_with_tls<T>(database_url: &str, tls: T) -> DbResult<Pool>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    build_pool(database_url, tls, DEFAULT_POOL_SIZE)
}

fn build_pool<T>(database_url: &str, tls: T, max_size: usize) -> DbResult<Pool>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    let config: tokio_postgres::Config = database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| DbError::Connection(e.to_string()))?;

    let manager = Manager::from_config(
        config,
        tls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );
    Pool::builder(manager)
        .max_size(max_size)
        .build()
        .map_err(|e| DbError::Pool(e.to_string()))
}
