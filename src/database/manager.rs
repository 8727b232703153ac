use std::time::{Duration, Instant};

use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, Transaction};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

/// Errors from the persistence gateway
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A multi-statement operation did not remove or write every row it had to.
    #[error("Partial failure: {0}")]
    PartialFailure(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Maps a unique constraint violation to `Conflict`, leaving other errors untouched.
    pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DatabaseError::Conflict(message.to_string())
            }
            _ => DatabaseError::Sqlx(err),
        }
    }

    /// Maps a foreign key violation to `NotFound`, leaving other errors untouched.
    pub fn not_found_on_foreign_key(err: sqlx::Error, message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                DatabaseError::NotFound(message.to_string())
            }
            _ => DatabaseError::Sqlx(err),
        }
    }
}

/// Owns the connection pool and hands out ready-to-use handles.
#[derive(Clone, Debug)]
pub struct DatabaseManager {
    pool: PgPool,
    slow_query_threshold: Duration,
}

impl DatabaseManager {
    /// Connect eagerly, failing if the store is unreachable.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = Self::connection_string(config)?;
        let pool = Self::pool_options(config).connect(&url).await?;
        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(Self {
            pool,
            slow_query_threshold: Duration::from_millis(config.slow_query_threshold_ms),
        })
    }

    /// Build the pool without touching the network; the first query connects.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = Self::connection_string(config)?;
        let pool = Self::pool_options(config).connect_lazy(&url)?;
        Ok(Self {
            pool,
            slow_query_threshold: Duration::from_millis(config.slow_query_threshold_ms),
        })
    }

    fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
    }

    fn connection_string(config: &DatabaseConfig) -> Result<String, DatabaseError> {
        let raw = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        match url.scheme() {
            "postgres" | "postgresql" => Ok(url.into()),
            _ => Err(DatabaseError::InvalidDatabaseUrl),
        }
    }

    /// The ready handle every repository runs its statements on.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Open a transaction; dropping it without `commit` rolls back.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, DatabaseError> {
        Ok(self.pool.begin().await?)
    }

    /// Warn when a statement started at `started` ran past the slow threshold.
    pub fn observe(&self, started: Instant, statement: &str) {
        let elapsed = started.elapsed();
        if elapsed > self.slow_query_threshold {
            warn!("Slow statement ({} ms): {}", elapsed.as_millis(), statement);
        }
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Apply the bundled migrations.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
        info!("Database migrations applied");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

/// Require that a statement touched exactly one row.
///
/// Zero rows means the target vanished between the existence check and the write; more than one
/// means the statement was keyed wrong. Both are reported, never swallowed.
pub fn expect_single_row(rows_affected: u64, what: &str) -> Result<(), DatabaseError> {
    match rows_affected {
        1 => Ok(()),
        0 => Err(DatabaseError::NotFound(format!("{} not found", what))),
        n => Err(DatabaseError::PartialFailure(format!(
            "expected one {} row to change, {} did",
            what, n
        ))),
    }
}
