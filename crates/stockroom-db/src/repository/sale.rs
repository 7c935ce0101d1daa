//! # Sale Repository
//!
//! The sale processor: records a sale and decrements stock as one unit.
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 POST /api/sales { productId: 4, quantity: 3 }           │
//! │                                                                         │
//! │  validate_quantity(3)                    (before any connection)       │
//! │       │                                                                 │
//! │  BEGIN IMMEDIATE                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE products SET quantity = quantity - 3                           │
//! │   WHERE id = 4 AND quantity >= 3        ← first statement              │
//! │       │                                                                 │
//! │       ├── 0 rows ──► product missing?  ProductNotFound                 │
//! │       │              otherwise         InsufficientStock               │
//! │       │              (ROLLBACK)                                        │
//! │       ▼                                                                 │
//! │  SELECT product 4   (name, category, price, cost to freeze)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT INTO sales (... total = price × 3, profit = (price−cost) × 3)  │
//! │       ├── total/profit overflow ──► OutOfRange (ROLLBACK)              │
//! │       │                                                                 │
//! │  COMMIT                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two sales racing for the last units serialize on SQLite's write lock. The
//! loser's conditional decrement sees the winner's committed quantity and
//! touches no rows, so stock never goes below zero.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use stockroom_core::validation::validate_quantity;
use stockroom_core::{CoreError, NewSale, Product, Sale, SaleTotals};

use crate::error::DbResult;
use crate::repository::product::fetch_product;
use crate::transaction::TransactionExecutor;

/// Repository for sales.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
    executor: TransactionExecutor,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool, executor: TransactionExecutor) -> Self {
        SaleRepository { pool, executor }
    }

    /// Lists every sale, most recent first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, product_id, product_name, category, quantity,
                   price_cents, cost_cents, total_cents, profit_cents,
                   customer, payment, notes, sale_date
            FROM sales
            ORDER BY sale_date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists the sales of one product, most recent first.
    pub async fn list_for_product(&self, product_id: i64) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, product_id, product_name, category, quantity,
                   price_cents, cost_cents, total_cents, profit_cents,
                   customer, payment, notes, sale_date
            FROM sales
            WHERE product_id = ?1
            ORDER BY sale_date DESC, id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Records a sale and decrements the product's stock atomically.
    ///
    /// ## Returns
    /// * `Ok(Sale)` - The stored sale with frozen pricing
    /// * `Err(DbError::Core(Validation))` - `quantity` outside `1..=MAX_STOCK`,
    ///   or a total/profit too large for an `i64` of cents
    /// * `Err(DbError::Core(ProductNotFound))` - Unknown product
    /// * `Err(DbError::Core(InsufficientStock))` - Not enough units; nothing written
    pub async fn record_sale(&self, sale: NewSale) -> DbResult<Sale> {
        validate_quantity(sale.quantity)?;

        debug!(
            product_id = sale.product_id,
            quantity = sale.quantity,
            "Recording sale"
        );

        let recorded = self
            .executor
            .run(move |conn| Box::pin(record_sale_in(conn, sale)))
            .await?;

        info!(
            sale_id = recorded.id,
            product_id = recorded.product_id,
            quantity = recorded.quantity,
            total = %recorded.total,
            profit = %recorded.profit,
            "Sale recorded"
        );
        Ok(recorded)
    }
}

// =============================================================================
// Unit-of-work steps
// =============================================================================

/// Full sale sequence on one transaction's connection.
pub(crate) async fn record_sale_in(conn: &mut SqliteConnection, sale: NewSale) -> DbResult<Sale> {
    let product = take_stock(&mut *conn, sale.product_id, sale.quantity).await?;
    insert_sale(conn, &product, &sale).await
}

/// Conditionally decrements stock and returns the product as it stands after
/// the decrement.
pub(crate) async fn take_stock(
    conn: &mut SqliteConnection,
    product_id: i64,
    quantity: i64,
) -> DbResult<Product> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET quantity = quantity - ?2,
            updated_at = ?3
        WHERE id = ?1 AND quantity >= ?2
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    let product = fetch_product(&mut *conn, product_id)
        .await?
        .ok_or(CoreError::ProductNotFound(product_id))?;

    if result.rows_affected() == 0 {
        return Err(CoreError::InsufficientStock {
            product: product.name,
            available: product.quantity,
            requested: quantity,
        }
        .into());
    }

    Ok(product)
}

/// Inserts the sale row, copying name, category, price and cost from `product`.
pub(crate) async fn insert_sale(
    conn: &mut SqliteConnection,
    product: &Product,
    sale: &NewSale,
) -> DbResult<Sale> {
    let totals = SaleTotals::compute(product.price, product.cost, sale.quantity)?;

    let result = sqlx::query(
        r#"
        INSERT INTO sales (
            product_id, product_name, category, quantity,
            price_cents, cost_cents, total_cents, profit_cents,
            customer, payment, notes, sale_date
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.category)
    .bind(sale.quantity)
    .bind(product.price)
    .bind(product.cost)
    .bind(totals.total)
    .bind(totals.profit)
    .bind(sale.customer_or_default())
    .bind(sale.payment_or_default())
    .bind(sale.notes_or_default())
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    let stored = sqlx::query_as::<_, Sale>(
        r#"
        SELECT id, product_id, product_name, category, quantity,
               price_cents, cost_cents, total_cents, profit_cents,
               customer, payment, notes, sale_date
        FROM sales
        WHERE id = ?1
        "#,
    )
    .bind(result.last_insert_rowid())
    .fetch_one(conn)
    .await?;

    Ok(stored)
}

// =============================================================================
// Unit Tests
// =============================================================================
