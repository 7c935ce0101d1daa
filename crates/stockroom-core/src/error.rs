//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule rejections                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError          - Database failures (wraps CoreError)            │
//! │                                                                         │
//! │  HTTP errors (apps/api)                                                │
//! │  └── ApiError         - What clients see (status + JSON body)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Response     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business rule errors.
///
/// Every variant is raised *before* any mutation becomes visible: the
/// surrounding unit of work is rolled back when one of these surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// No product row has the given id.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Requested sale quantity exceeds the product's current stock.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /api/sales { productId: 4, quantity: 999 }
    ///      │
    ///      ▼
    /// Conditional decrement touches 0 rows, product has 7
    ///      │
    ///      ▼
    /// InsufficientStock { available: 7, requested: 999 }
    ///      │
    ///      ▼
    /// 400 { "error": "Insufficient stock", "available": 7, "requested": 999 }
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Product deletion blocked because sales still reference it.
    #[error("Cannot delete \"{name}\" because it has {sales} recorded sales.")]
    ProductHasSales { name: String, sales: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-numeric id, malformed amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is larger than the store can hold or compute with.
    #[error("{field} must not exceed {max}")]
    OutOfRange { field: String, max: String },
}

// =============================================================================
// Unit Tests
// =============================================================================
