//! `PostgreSQL` connection pool for one data service.
//!
//! Each catalog service reads a single database whose schema and seed data
//! belong to the deployment, so there are no migrations here. Queries are
//! built at runtime and every value is bound as a parameter.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::error::DbError;

/// How long a request waits for a pooled connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Idle connections are closed after this long.
const IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// Pooled connections to a catalog database.
#[derive(Debug, Clone)]
pub struct PostgresPool {
    pool: PgPool,
}

impl PostgresPool {
    /// Open a pool of at most `max_connections` against `url` and check it
    /// answers `SELECT 1`.
    ///
    /// A malformed URL fails immediately with [`DbError::Config`]; an
    /// unreachable server fails with [`DbError::Postgres`] and is worth
    /// retrying.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DbError> {
        let options: PgConnectOptions = url
            .parse()
            .map_err(|e: sqlx::Error| DbError::Config(format!("invalid database URL: {e}")))?;
        let host = options.get_host().to_owned();
        let database = options.get_database().unwrap_or_default().to_owned();

        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .idle_timeout(IDLE_TIMEOUT)
            .connect_with(options)
            .await?;
        sqlx::query("SELECT 1").execute(&pool).await?;

        tracing::info!(%host, %database, max_connections, "connected to catalog database");
        Ok(Self { pool })
    }

    /// The underlying [`PgPool`], for building stores.
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every connection, waiting for checked-out ones to return.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("catalog database pool closed");
    }
}
