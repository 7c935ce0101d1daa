//! # Transaction Executor
//!
//! Runs a unit of work against one pooled connection inside a single
//! SQLite transaction.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Unit of Work Lifecycle                            │
//! │                                                                         │
//! │  executor.run(|conn| ...)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pool.begin_with ──► connection checked out, BEGIN IMMEDIATE           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  work(conn) ──► step 1 ──► step 2 ──► ... (same connection)            │
//! │       │                                                                 │
//! │       ├── Ok(value)  ──► COMMIT   ──► Ok(value)                        │
//! │       │                                                                 │
//! │       └── Err(e)     ──► ROLLBACK ──► Err(e)  (unchanged)              │
//! │                                                                         │
//! │  Connection returns to the pool on every path. A UnitOfWork dropped    │
//! │  without commit (early `?`, panic, cancelled future) rolls back.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every unit of work writes. `BEGIN IMMEDIATE` takes the write lock
//! (waiting up to `busy_timeout`) before the first read, so a unit that reads
//! then writes never has to upgrade a stale snapshot (`SQLITE_BUSY_SNAPSHOT`).
//!
//! ## Writing Steps
//! Steps are plain `async fn`s over `&mut SqliteConnection`, so any number of
//! them compose into one unit of work:
//!
//! ```rust,ignore
//! executor
//!     .run(move |conn| Box::pin(record_sale_in(conn, sale)))
//!     .await?;
//! ```

use futures::future::BoxFuture;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::{error, warn};

use crate::error::{DbError, DbResult};

/// An open transaction owning one pooled connection.
///
/// Dropping it without calling [`UnitOfWork::commit`] rolls back.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    /// The connection every step of this unit of work runs on.
    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }

    /// Makes every write of this unit of work visible.
    pub async fn commit(self) -> DbResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }

    /// Discards every write of this unit of work.
    pub async fn rollback(self) -> DbResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }
}

/// Opens units of work on a pool and runs closures inside them.
#[derive(Debug, Clone)]
pub struct TransactionExecutor {
    pool: SqlitePool,
}

impl TransactionExecutor {
    pub fn new(pool: SqlitePool) -> Self {
        TransactionExecutor { pool }
    }

    /// Checks out a connection and issues `BEGIN IMMEDIATE`.
    pub async fn begin(&self) -> DbResult<UnitOfWork> {
        let tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        Ok(UnitOfWork { tx })
    }

    /// Runs `work` atomically.
    ///
    /// ## Returns
    /// * `Ok(T)` - every step succeeded and the commit went through
    /// * `Err(DbError)` - the first error raised by `work` (after rollback),
    ///   or the begin/commit failure
    pub async fn run<T, F>(&self, work: F) -> DbResult<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, DbResult<T>> + Send,
    {
        let mut uow = self.begin().await?;
        let outcome = work(uow.connection()).await;

        match outcome {
            Ok(value) => {
                uow.commit().await?;
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, "Rolling back unit of work");
                if let Err(rollback_err) = uow.rollback().await {
                    // Connection is discarded by the pool; the original error wins.
                    error!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
