//! # Statistics Repository
//!
//! Dashboard counters computed in a single read-only query.

use sqlx::SqlitePool;
use tracing::debug;

use stockroom_core::InventoryStats;

use crate::error::DbResult;

/// Repository for aggregate inventory statistics.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    pool: SqlitePool,
}

impl StatsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StatsRepository { pool }
    }

    /// Computes the dashboard summary.
    ///
    /// Empty tables yield zeros. "Today" is the server's local calendar day.
    ///
    /// Each product's `quantity × price` fits in an `i64` of cents; a sum
    /// that does not fails with `DbError::Overflow` rather than coming back
    /// as a lossy REAL.
    pub async fn summary(&self) -> DbResult<InventoryStats> {
        let stats = sqlx::query_as::<_, InventoryStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM products) AS total_products,
                (SELECT COALESCE(SUM(quantity * price_cents), 0) FROM products) AS total_value,
                (SELECT COUNT(*) FROM products
                  WHERE quantity > 0 AND quantity <= min_stock) AS low_stock,
                (SELECT COUNT(*) FROM sales) AS total_sales,
                (SELECT COALESCE(SUM(total_cents), 0) FROM sales) AS total_revenue,
                (SELECT COALESCE(SUM(profit_cents), 0) FROM sales) AS total_profit,
                (SELECT COUNT(*) FROM sales
                  WHERE date(sale_date, 'localtime') = date('now', 'localtime')) AS today_sales
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        debug!(
            total_products = stats.total_products,
            total_sales = stats.total_sales,
            "Computed inventory stats"
        );
        Ok(stats)
    }
}
