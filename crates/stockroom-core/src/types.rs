//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │  StockMovement  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │◄──│  product_id     │   │  product_id ───►│ Product
//! │  │  quantity ≥ 0   │   │  name snapshot  │   │  movement_type  │       │
//! │  │  price / cost   │   │  total / profit │   │  supplier, cost │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Product 1──* Sale           (deletion blocked while sales exist)      │
//! │  Product 1──* StockMovement  (removed together with the product)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A sale copies the product's name, category, price and cost at the moment
//! it is recorded. Editing the product afterwards never rewrites history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::{DEFAULT_CUSTOMER, DEFAULT_MIN_STOCK, DEFAULT_PAYMENT};

// =============================================================================
// Product
// =============================================================================

/// An inventory item with current stock, pricing and cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Surrogate key assigned by the database.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Free-form category label.
    pub category: String,

    /// Current stock. Never negative after a committed transaction.
    pub quantity: i64,

    /// Unit price.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents"))]
    #[ts(as = "String")]
    pub price: Money,

    /// Unit cost (for profit calculations).
    #[cfg_attr(feature = "sqlx", sqlx(rename = "cost_cents"))]
    #[ts(as = "String")]
    pub cost: Money,

    /// Low-stock threshold.
    pub min_stock: i64,

    /// Free-text notes.
    pub notes: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Stock is running low: some units left, but no more than `min_stock`.
    ///
    /// An empty shelf (quantity 0) is "out of stock", not "low stock". Same
    /// rule as the `lowstock` counter of the stats query.
    pub fn is_low_stock(&self) -> bool {
        self.quantity > 0 && self.quantity <= self.min_stock
    }
}

/// Fields supplied when creating a product or fully replacing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub price: Money,
    pub cost: Money,
    pub min_stock: i64,
    pub notes: String,
}

impl NewProduct {
    /// Creates the product fields with the default threshold and empty notes.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: i64,
        price: Money,
        cost: Money,
    ) -> Self {
        NewProduct {
            name: name.into(),
            category: category.into(),
            quantity,
            price,
            cost,
            min_stock: DEFAULT_MIN_STOCK,
            notes: String::new(),
        }
    }

    /// Sets the low-stock threshold.
    pub fn min_stock(mut self, min_stock: i64) -> Self {
        self.min_stock = min_stock;
        self
    }

    /// Sets the notes.
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Confirmation returned after a product and its stock movements are removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedProduct {
    pub id: i64,
    pub name: String,
    pub movements_removed: u64,
}

// =============================================================================
// Sale
// =============================================================================

/// An immutable record of units sold, with pricing frozen at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub product_id: i64,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Product category at time of sale (frozen).
    pub category: String,
    pub quantity: i64,
    /// Unit price at time of sale (frozen).
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents"))]
    #[ts(as = "String")]
    pub price: Money,
    /// Unit cost at time of sale (frozen).
    #[cfg_attr(feature = "sqlx", sqlx(rename = "cost_cents"))]
    #[ts(as = "String")]
    pub cost: Money,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "total_cents"))]
    #[ts(as = "String")]
    pub total: Money,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "profit_cents"))]
    #[ts(as = "String")]
    pub profit: Money,
    pub customer: String,
    pub payment: String,
    pub notes: String,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
}

/// A request to sell `quantity` units of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub product_id: i64,
    pub quantity: i64,
    pub customer: Option<String>,
    pub payment: Option<String>,
    pub notes: Option<String>,
}

impl NewSale {
    /// Creates a sale request with no customer, payment or notes.
    pub fn new(product_id: i64, quantity: i64) -> Self {
        NewSale {
            product_id,
            quantity,
            customer: None,
            payment: None,
            notes: None,
        }
    }

    /// Customer to record; blank falls back to [`DEFAULT_CUSTOMER`].
    pub fn customer_or_default(&self) -> &str {
        non_blank(&self.customer).unwrap_or(DEFAULT_CUSTOMER)
    }

    /// Payment method to record; blank falls back to [`DEFAULT_PAYMENT`].
    pub fn payment_or_default(&self) -> &str {
        non_blank(&self.payment).unwrap_or(DEFAULT_PAYMENT)
    }

    pub fn notes_or_default(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// Direction of a stock movement.
///
/// Only inbound movements are produced today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum MovementType {
    /// Goods received from a supplier.
    Inbound,
}

/// An audit record of inventory received for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockMovement {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub movement_type: MovementType,
    pub supplier: String,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "cost_cents"))]
    #[ts(as = "String")]
    pub cost: Money,
    pub notes: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A request to receive `quantity` units of a product into stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStockEntry {
    pub product_id: i64,
    pub quantity: i64,
    pub supplier: Option<String>,
    pub cost: Option<Money>,
    pub notes: Option<String>,
}

impl NewStockEntry {
    /// Creates a stock entry with no supplier, cost or notes.
    pub fn new(product_id: i64, quantity: i64) -> Self {
        NewStockEntry {
            product_id,
            quantity,
            supplier: None,
            cost: None,
            notes: None,
        }
    }

    pub fn supplier_or_default(&self) -> &str {
        self.supplier.as_deref().unwrap_or("")
    }

    pub fn cost_or_default(&self) -> Money {
        self.cost.unwrap_or_default()
    }

    pub fn notes_or_default(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Inventory Statistics
// =============================================================================

/// Aggregate counters over products and sales.
///
/// Field names on the wire are the flat lowercase keys the dashboard reads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryStats {
    #[serde(rename = "totalproducts")]
    pub total_products: i64,

    /// Σ quantity × price over all products.
    #[serde(rename = "totalvalue")]
    #[ts(as = "String")]
    pub total_value: Money,

    /// Products with `0 < quantity <= min_stock`.
    #[serde(rename = "lowstock")]
    pub low_stock: i64,

    #[serde(rename = "totalsales")]
    pub total_sales: i64,

    #[serde(rename = "totalrevenue")]
    #[ts(as = "String")]
    pub total_revenue: Money,

    #[serde(rename = "totalprofit")]
    #[ts(as = "String")]
    pub total_profit: Money,

    /// Sales dated on the server's current calendar day.
    #[serde(rename = "todaysales")]
    pub today_sales: i64,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

// =============================================================================
// Unit Tests
// =============================================================================
