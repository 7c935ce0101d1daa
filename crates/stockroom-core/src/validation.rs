//! # Validation Module
//!
//! Input checks applied before a unit of work opens.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extraction (apps/api)                                   │
//! │  ├── JSON shape, required fields, numeric types                        │
//! │  └── Path ids via parse_id                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Quantities for sales and stock receipts: 1..=MAX_STOCK            │
//! │  └── Product stock ≤ MAX_STOCK, price and cost within Money::MAX       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 0) on products                                 │
//! │  ├── Guard triggers: quantity an INTEGER, at most 10000000             │
//! │  └── Foreign keys from sales / stock_movements                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{parse_id, validate_quantity};
//!
//! assert_eq!(parse_id("42").unwrap(), 42);
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::NewProduct;
use crate::MAX_STOCK;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a sale or stock-receipt quantity.
///
/// Zero or negative would turn a sale into a silent restock (or a receipt
/// into a silent write-off), so both are rejected. No single movement may
/// exceed [`MAX_STOCK`].
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    validate_stock_level(quantity)
}

/// Rejects a stock level above [`MAX_STOCK`].
///
/// Negative levels are left to the `products.quantity` CHECK constraint.
pub fn validate_stock_level(quantity: i64) -> ValidationResult<()> {
    if quantity > MAX_STOCK {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            max: MAX_STOCK.to_string(),
        });
    }
    Ok(())
}

/// Checks the numeric fields of a product before it is written.
///
/// JSON input is already bounded by `Money`'s deserializer; this also covers
/// values built in code.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_stock_level(product.quantity)?;
    validate_amount("price", product.price)?;
    validate_amount("cost", product.cost)
}

fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.cents().unsigned_abs() > Money::MAX.cents().unsigned_abs() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            max: Money::MAX.to_string(),
        });
    }
    Ok(())
}

/// Parses a product id taken from a URL path segment.
pub fn parse_id(raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    raw.parse::<i64>().map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: format!("'{raw}' is not an integer"),
    })
}
