//! # Stock Movement Repository
//!
//! Receives inventory into stock and keeps the audit trail of receipts.
//!
//! ```text
//! POST /api/stock/add { productId: 4, quantity: 10, supplier: "Acme" }
//!      │
//!      ▼
//! BEGIN IMMEDIATE
//!   UPDATE products SET quantity = quantity + 10
//!    WHERE id = 4 AND quantity <= MAX_STOCK - 10
//!      ├── 0 rows, no product  ──► ProductNotFound (ROLLBACK)
//!      ├── 0 rows, product     ──► OutOfRange      (ROLLBACK)
//!      ▼
//!   INSERT INTO stock_movements (..., 'INBOUND', 'Acme', ...)
//! COMMIT
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use stockroom_core::validation::validate_quantity;
use stockroom_core::{
    CoreError, MovementType, NewStockEntry, StockMovement, ValidationError, MAX_STOCK,
};

use crate::error::DbResult;
use crate::repository::product::fetch_product;
use crate::transaction::TransactionExecutor;

/// Repository for stock movements.
#[derive(Debug, Clone)]
pub struct StockMovementRepository {
    pool: SqlitePool,
    executor: TransactionExecutor,
}

impl StockMovementRepository {
    pub fn new(pool: SqlitePool, executor: TransactionExecutor) -> Self {
        StockMovementRepository { pool, executor }
    }

    /// Adds `quantity` units to a product and records an inbound movement.
    ///
    /// ## Returns
    /// * `Ok(StockMovement)` - The recorded movement
    /// * `Err(DbError::Core(Validation))` - `quantity` outside `1..=MAX_STOCK`,
    ///   or the product would end up holding more than `MAX_STOCK`
    /// * `Err(DbError::Core(ProductNotFound))` - Unknown product; nothing written
    pub async fn add_stock(&self, entry: NewStockEntry) -> DbResult<StockMovement> {
        validate_quantity(entry.quantity)?;

        debug!(
            product_id = entry.product_id,
            quantity = entry.quantity,
            "Adding stock"
        );

        let movement = self
            .executor
            .run(move |conn| Box::pin(add_stock_in(conn, entry)))
            .await?;

        info!(
            movement_id = movement.id,
            product_id = movement.product_id,
            quantity = movement.quantity,
            "Stock added"
        );
        Ok(movement)
    }

    /// Lists the movements of one product, newest first.
    pub async fn list_for_product(&self, product_id: i64) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, product_id, quantity, movement_type, supplier,
                   cost_cents, notes, created_at
            FROM stock_movements
            WHERE product_id = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }
}

/// Increment then audit, on one transaction's connection.
pub(crate) async fn add_stock_in(
    conn: &mut SqliteConnection,
    entry: NewStockEntry,
) -> DbResult<StockMovement> {
    let now = Utc::now();

    // ?4 - ?2 never overflows: both are within 1..=MAX_STOCK
    let updated = sqlx::query(
        r#"
        UPDATE products
        SET quantity = quantity + ?2,
            updated_at = ?3
        WHERE id = ?1 AND quantity <= ?4 - ?2
        "#,
    )
    .bind(entry.product_id)
    .bind(entry.quantity)
    .bind(now)
    .bind(MAX_STOCK)
    .execute(&mut *conn)
    .await?;

    if updated.rows_affected() == 0 {
        return match fetch_product(&mut *conn, entry.product_id).await? {
            Some(_) => Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                max: MAX_STOCK.to_string(),
            }
            .into()),
            None => Err(CoreError::ProductNotFound(entry.product_id).into()),
        };
    }

    let inserted = sqlx::query(
        r#"
        INSERT INTO stock_movements (
            product_id, quantity, movement_type, supplier, cost_cents, notes, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(entry.product_id)
    .bind(entry.quantity)
    .bind(MovementType::Inbound)
    .bind(entry.supplier_or_default())
    .bind(entry.cost_or_default())
    .bind(entry.notes_or_default())
    .bind(now)
    .execute(&mut *conn)
    .await?;

    let movement = sqlx::query_as::<_, StockMovement>(
        r#"
        SELECT id, product_id, quantity, movement_type, supplier,
               cost_cents, notes, created_at
        FROM stock_movements
        WHERE id = ?1
        "#,
    )
    .bind(inserted.last_insert_rowid())
    .fetch_one(conn)
    .await?;

    Ok(movement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use stockroom_core::{Money, NewProduct};

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .create(NewProduct::new(
                "Cable",
                "Accessories",
                2,
                Money::from_units(10),
                Money::from_units(4),
            ))
            .await
            .unwrap();
        (db, product.id)
    }

    #[tokio::test]
    async fn test_add_stock_increments_and_records() {
        let (db, id) = setup().await;

        let mut entry = NewStockEntry::new(id, 10);
        entry.supplier = Some("Acme".to_string());
        entry.cost = Some(Money::from_cents(350));

        let movement = db.stock().add_stock(entry).await.unwrap();

        assert_eq!(movement.product_id, id);
        assert_eq!(movement.quantity, 10);
        assert_eq!(movement.movement_type, MovementType::Inbound);
        assert_eq!(movement.supplier, "Acme");
        assert_eq!(movement.cost, Money::from_cents(350));
        assert_eq!(movement.notes, "");

        assert_eq!(db.products().require(id).await.unwrap().quantity, 12);
    }

    #[tokio::test]
    async fn test_add_stock_defaults() {
        let (db, id) = setup().await;

        let movement = db.stock().add_stock(NewStockEntry::new(id, 1)).await.unwrap();

        assert_eq!(movement.supplier, "");
        assert_eq!(movement.cost, Money::zero());
    }

    #[tokio::test]
    async fn test_add_stock_unknown_product_writes_nothing() {
        let (db, _) = setup().await;

        let result = db.stock().add_stock(NewStockEntry::new(777, 5)).await;
        assert!(matches!(
            result,
            Err(DbError::Core(CoreError::ProductNotFound(777)))
        ));
        assert!(db.stock().list_for_product(777).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_stock_rejects_non_positive_quantity() {
        let (db, id) = setup().await;

        let result = db.stock().add_stock(NewStockEntry::new(id, 0)).await;
        assert!(matches!(
            result,
            Err(DbError::Core(CoreError::Validation(
                ValidationError::MustBePositive { .. }
            )))
        ));
        assert_eq!(db.products().require(id).await.unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn test_add_stock_near_i64_max_leaves_row_intact() {
        let (db, id) = setup().await;

        for quantity in [i64::MAX, i64::MAX - 1, MAX_STOCK + 1] {
            let result = db.stock().add_stock(NewStockEntry::new(id, quantity)).await;
            assert!(matches!(
                result,
                Err(DbError::Core(CoreError::Validation(
                    ValidationError::OutOfRange { .. }
                )))
            ));
        }

        // Still an INTEGER the repositories can decode.
        assert_eq!(db.products().require(id).await.unwrap().quantity, 2);
        assert_eq!(db.products().list().await.unwrap()[0].quantity, 2);
        assert!(db.stock().list_for_product(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_stock_up_to_the_ceiling() {
        let (db, id) = setup().await;

        db.stock()
            .add_stock(NewStockEntry::new(id, MAX_STOCK - 2))
            .await
            .unwrap();
        assert_eq!(db.products().require(id).await.unwrap().quantity, MAX_STOCK);

        let result = db.stock().add_stock(NewStockEntry::new(id, 1)).await;
        assert!(matches!(
            result,
            Err(DbError::Core(CoreError::Validation(
                ValidationError::OutOfRange { .. }
            )))
        ));
        assert_eq!(db.products().require(id).await.unwrap().quantity, MAX_STOCK);
        assert_eq!(db.stock().list_for_product(id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_movements_newest_first() {
        let (db, id) = setup().await;

        let first = db.stock().add_stock(NewStockEntry::new(id, 1)).await.unwrap();
        let second = db.stock().add_stock(NewStockEntry::new(id, 2)).await.unwrap();

        let ids: Vec<i64> = db
            .stock()
            .list_for_product(id)
            .await
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
