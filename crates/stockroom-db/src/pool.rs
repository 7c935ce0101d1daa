//! # Database Handle
//!
//! Opens the SQLite file, makes sure the schema exists and hands out
//! repositories that share one pool.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig ──► connect_options() ──► SqlitePool ──► schema::bootstrap    │
//! │                 WAL                    │                                │
//! │                 foreign_keys = ON      ├── ProductRepository       (tx) │
//! │                 busy_timeout           ├── SaleRepository          (tx) │
//! │                                        ├── StockMovementRepository (tx) │
//! │                                        └── StatsRepository              │
//! │                                                                         │
//! │  (tx): writes go through the shared TransactionExecutor. Reads run on  │
//! │  any idle connection; a unit of work holds one connection from BEGIN   │
//! │  to COMMIT/ROLLBACK.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! In WAL mode readers never wait on the writer; concurrent writers queue on
//! SQLite's lock for up to `connect_timeout`.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use futures::future::BoxFuture;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::stats::StatsRepository;
use crate::repository::stock::StockMovementRepository;
use crate::schema;
use crate::transaction::{TransactionExecutor, UnitOfWork};

const MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the data lives and how the pool behaves.
///
/// ```rust,ignore
/// let config = DbConfig::new("./stockroom.db")
///     .max_connections(8)
///     .connect_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, created on first use. `:memory:` for a throwaway store.
    pub database_path: PathBuf,

    /// Pool ceiling (default 5)
    pub max_connections: u32,

    /// Connections kept open while idle (default 1)
    pub min_connections: u32,

    /// Upper bound on waiting for a pooled connection, and for SQLite's
    /// write lock (default 30s)
    pub connect_timeout: Duration,

    /// Idle connections above the minimum are closed after this (default 10m)
    pub idle_timeout: Duration,

    /// Create missing tables when the pool opens (default true)
    pub bootstrap_schema: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            bootstrap_schema: true,
        }
    }

    /// A private in-memory store for tests.
    ///
    /// Each connection to `:memory:` would see its own empty database, so
    /// the pool is held to exactly one connection.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            ..DbConfig::new(MEMORY_PATH)
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn bootstrap_schema(mut self, bootstrap: bool) -> Self {
        self.bootstrap_schema = bootstrap;
        self
    }

    fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(MEMORY_PATH)
    }

    /// SQLite settings applied to every pooled connection.
    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
        };

        Ok(options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // off by default in SQLite
            .foreign_keys(true)
            .busy_timeout(self.connect_timeout))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Shared entry point to the store. Clones share the pool.
///
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./stockroom.db")).await?;
/// let sale = db.sales().record_sale(NewSale::new(product_id, 3)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    executor: TransactionExecutor,
}

impl Database {
    /// Opens the pool and, unless disabled, bootstraps the schema.
    ///
    /// Fails with `ConnectionFailed` when the file can't be opened or
    /// created.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening stockroom database");

        let options = config.connect_options()?;
        debug!(
            in_memory = config.is_in_memory(),
            busy_timeout_ms = config.connect_timeout.as_millis() as u64,
            "SQLite options ready"
        );

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Pool open"
        );

        let db = Database {
            executor: TransactionExecutor::new(pool.clone()),
            pool,
        };

        if config.bootstrap_schema {
            db.bootstrap_schema().await?;
        }

        Ok(db)
    }

    /// Creates any missing tables and indexes. Safe to call repeatedly.
    pub async fn bootstrap_schema(&self) -> DbResult<()> {
        schema::bootstrap(&self.pool).await
    }

    /// Raw pool, for queries no repository covers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Opens a unit of work for callers that drive commit/rollback by hand.
    pub async fn begin(&self) -> DbResult<UnitOfWork> {
        self.executor.begin().await
    }

    /// Runs `work` in one transaction: commit on `Ok`, rollback on `Err`.
    pub async fn transaction<T, F>(&self, work: F) -> DbResult<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, DbResult<T>> + Send,
    {
        self.executor.run(work).await
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone(), self.executor.clone())
    }

    /// The sale processor.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone(), self.executor.clone())
    }

    pub fn stock(&self) -> StockMovementRepository {
        StockMovementRepository::new(self.pool.clone(), self.executor.clone())
    }

    pub fn stats(&self) -> StatsRepository {
        StatsRepository::new(self.pool.clone())
    }

    /// Waits for checked-out connections to return, then closes the pool.
    /// Every later query fails.
    pub async fn close(&self) {
        info!("Closing stockroom database");
        self.pool.close().await;
    }

    /// `true` when a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.bootstrap_schema().await.unwrap();

        let (embedded, applied) = schema::schema_status(db.pool()).await.unwrap();
        assert_eq!(embedded, applied);
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockroom.db");

        let db = Database::new(DbConfig::new(path.clone())).await.unwrap();
        assert!(db.health_check().await);
        db.close().await;

        let db = Database::new(DbConfig::new(path.clone())).await.unwrap();
        assert!(db.health_check().await);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_closed_pool_fails_health_check() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/var/lib/stockroom/data.db")
            .max_connections(10)
            .min_connections(2)
            .bootstrap_schema(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.bootstrap_schema);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }
}
