//! # Schema Bootstrap
//!
//! Embedded SQL that creates the Stockroom tables at startup.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Schema Bootstrap                                   │
//! │                                                                         │
//! │  Database::new(config)                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Check _sqlx_migrations table (created if missing)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  001_initial_schema.sql                                                │
//! │       ├── products         (CHECK quantity >= 0)                       │
//! │       ├── sales            (FK → products)                             │
//! │       └── stock_movements  (FK → products)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  002_products_quantity_guard.sql                                       │
//! │       └── triggers: quantity stays an INTEGER in 0..=10000000          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Server starts accepting requests                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every statement is `CREATE ... IF NOT EXISTS`, so a database created by
//! an earlier deployment without the migrations table bootstraps cleanly.
//! New schema changes go in a new numbered file; existing files never change.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};

/// Schema files from `migrations/sqlite`, embedded at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every schema file not yet recorded as applied.
///
/// Idempotent: running it against an up-to-date database is a no-op.
pub async fn bootstrap(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending schema changes");

    MIGRATOR.run(pool).await?;

    info!("Schema up to date");
    Ok(())
}

/// Returns `(embedded, applied)` schema file counts.
pub async fn schema_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;
    let applied = usize::try_from(applied).map_err(|e| DbError::Internal(e.to_string()))?;

    Ok((embedded, applied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use stockroom_core::{Money, NewProduct};

    #[tokio::test]
    async fn test_schema_status_counts_applied_files() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let (embedded, applied) = schema_status(db.pool()).await.unwrap();
        assert_eq!(embedded, 2);
        assert_eq!(applied, 2);
    }

    #[tokio::test]
    async fn test_schema_status_fails_without_bootstrap() {
        let db = Database::new(DbConfig::in_memory().bootstrap_schema(false))
            .await
            .unwrap();

        assert!(matches!(
            schema_status(db.pool()).await,
            Err(DbError::QueryFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_overflowing_quantity_write_is_refused() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .create(NewProduct::new("Cable", "Accessories", 2, Money::from_units(10), Money::from_units(4)))
            .await
            .unwrap();

        // i64 overflow in SQLite yields a REAL instead of an error
        let result = sqlx::query("UPDATE products SET quantity = quantity + ?1 WHERE id = ?2")
            .bind(i64::MAX)
            .bind(product.id)
            .execute(db.pool())
            .await;
        assert!(matches!(
            result.map_err(DbError::from),
            Err(DbError::CheckViolation { .. })
        ));

        let result = sqlx::query("UPDATE products SET quantity = 10000001 WHERE id = ?1")
            .bind(product.id)
            .execute(db.pool())
            .await;
        assert!(result.is_err());

        assert_eq!(db.products().require(product.id).await.unwrap().quantity, 2);
    }
}
