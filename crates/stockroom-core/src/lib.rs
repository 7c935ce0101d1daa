//! # stockroom-core: Pure Business Logic for Stockroom
//!
//! This crate holds the inventory domain as plain data and pure functions.
//! It never touches the database or the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (apps/api, axum)                    │   │
//! │  │    /api/products  /api/sales  /api/stock/add  /api/stats        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    stockroom-db (repositories)                  │   │
//! │  │        transactions, SQL, stock decrement / increment           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ stockroom-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   error   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ CoreError │  │   rules   │  │   │
//! │  │   │   Sale    │  │ SaleTotals│  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, StockMovement, InventoryStats)
//! - [`money`] - Fixed-point money with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::money::{Money, SaleTotals};
//!
//! let price = Money::from_cents(10_000); // 100.00
//! let cost = Money::from_cents(6_000);   //  60.00
//!
//! let totals = SaleTotals::compute(price, cost, 3).unwrap();
//! assert_eq!(totals.total.to_string(), "300.00");
//! assert_eq!(totals.profit.to_string(), "120.00");
//! ```

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::{Money, SaleTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum-stock threshold applied when a product is created without one.
pub const DEFAULT_MIN_STOCK: i64 = 5;

/// Customer recorded on a sale when the caller names none.
pub const DEFAULT_CUSTOMER: &str = "General customer";

/// Payment method recorded on a sale when the caller names none.
pub const DEFAULT_PAYMENT: &str = "Cash";

/// Most units a single product may hold.
///
/// With prices capped at [`Money::MAX`], `quantity × price` of one product
/// stays below `i64::MAX` cents.
pub const MAX_STOCK: i64 = 10_000_000;
