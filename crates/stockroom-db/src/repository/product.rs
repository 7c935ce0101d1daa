//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Listing (newest first) and lookup by id
//! - Create / full replace
//! - Guarded delete
//!
//! ## Delete Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    DELETE /api/products/7                               │
//! │                                                                         │
//! │  BEGIN IMMEDIATE   (write lock before the first read)                  │
//! │    │                                                                    │
//! │    ├── SELECT product 7 ────────── missing? ──► ProductNotFound        │
//! │    │                                                                    │
//! │    ├── COUNT sales of product 7 ── > 0?     ──► ProductHasSales        │
//! │    │                                             (nothing written)      │
//! │    ├── DELETE stock_movements of product 7                             │
//! │    │                                                                    │
//! │    └── DELETE product 7                                                │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Sales are history and are never cascaded. Stock movements go with     │
//! │  their product.                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use stockroom_core::validation::validate_new_product;
use stockroom_core::{CoreError, DeletedProduct, NewProduct, Product};

use crate::error::DbResult;
use crate::transaction::TransactionExecutor;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let created = repo.create(NewProduct::new("Lamp", "Lighting", 10, price, cost)).await?;
/// let product = repo.require(created.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    executor: TransactionExecutor,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool, executor: TransactionExecutor) -> Self {
        ProductRepository { pool, executor }
    }

    /// Lists every product, most recently created first.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        debug!("Listing products");

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, quantity, price_cents, cost_cents,
                   min_stock, notes, created_at, updated_at
            FROM products
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        fetch_product(&mut conn, id).await
    }

    /// Gets a product by its ID, or fails with `ProductNotFound`.
    pub async fn require(&self, id: i64) -> DbResult<Product> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(id).into())
    }

    /// Inserts a new product and returns the stored row.
    ///
    /// Quantity above `MAX_STOCK` or a price/cost past `Money::MAX` is a
    /// validation error. A negative quantity is rejected by the table's CHECK
    /// constraint (`DbError::CheckViolation`).
    pub async fn create(&self, product: NewProduct) -> DbResult<Product> {
        validate_new_product(&product)?;
        debug!(name = %product.name, "Creating product");

        let mut conn = self.pool.acquire().await?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                name, category, quantity, price_cents, cost_cents,
                min_stock, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            "#,
        )
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.quantity)
        .bind(product.price)
        .bind(product.cost)
        .bind(product.min_stock)
        .bind(&product.notes)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        // last_insert_rowid is per connection; read back on the same one
        let id = result.last_insert_rowid();
        let created = fetch_product(&mut conn, id)
            .await?
            .ok_or(CoreError::ProductNotFound(id))?;

        info!(product_id = id, name = %created.name, "Product created");
        Ok(created)
    }

    /// Replaces every editable field of a product and refreshes `updated_at`.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The updated row
    /// * `Err(DbError::Core(ProductNotFound))` - No product with this id
    /// * `Err(DbError::Core(Validation))` - Same bounds as [`create`](Self::create)
    pub async fn update(&self, id: i64, product: NewProduct) -> DbResult<Product> {
        validate_new_product(&product)?;
        debug!(product_id = id, "Updating product");

        let mut conn = self.pool.acquire().await?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                category = ?3,
                quantity = ?4,
                price_cents = ?5,
                cost_cents = ?6,
                min_stock = ?7,
                notes = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.quantity)
        .bind(product.price)
        .bind(product.cost)
        .bind(product.min_stock)
        .bind(&product.notes)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ProductNotFound(id).into());
        }

        let updated = fetch_product(&mut conn, id)
            .await?
            .ok_or(CoreError::ProductNotFound(id))?;

        info!(product_id = id, "Product updated");
        Ok(updated)
    }

    /// Deletes a product that has never been sold, along with its stock
    /// movements, in one transaction.
    pub async fn delete(&self, id: i64) -> DbResult<DeletedProduct> {
        debug!(product_id = id, "Deleting product");

        let deleted = self
            .executor
            .run(move |conn| Box::pin(delete_product_in(conn, id)))
            .await?;

        info!(
            product_id = id,
            name = %deleted.name,
            movements_removed = deleted.movements_removed,
            "Product deleted"
        );
        Ok(deleted)
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit-of-work steps
// =============================================================================

/// Loads one product on the given connection.
pub(crate) async fn fetch_product(
    conn: &mut SqliteConnection,
    id: i64,
) -> DbResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, category, quantity, price_cents, cost_cents,
               min_stock, notes, created_at, updated_at
        FROM products
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(product)
}

/// Delete sequence: load, refuse if sold, drop movements, drop product.
pub(crate) async fn delete_product_in(
    conn: &mut SqliteConnection,
    id: i64,
) -> DbResult<DeletedProduct> {
    let product = fetch_product(&mut *conn, id)
        .await?
        .ok_or(CoreError::ProductNotFound(id))?;

    let sales: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE product_id = ?1")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    if sales > 0 {
        return Err(CoreError::ProductHasSales {
            name: product.name,
            sales,
        }
        .into());
    }

    let movements = sqlx::query("DELETE FROM stock_movements WHERE product_id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    sqlx::query("DELETE FROM products WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(DeletedProduct {
        id,
        name: product.name,
        movements_removed: movements.rows_affected(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
