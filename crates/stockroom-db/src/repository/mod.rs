//! # Repository Module
//!
//! Database repository implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories and Units of Work                       │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.sales().record_sale(new_sale)                              │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── reads:  run directly on the pool                                  │
//! │  └── writes: executor.run(|conn| step(conn, ...))                      │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │              free `async fn` steps over &mut SqliteConnection           │
//! │              (take_stock, insert_sale, add_stock_in, ...)               │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │              SQLite (one transaction, one connection)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD and guarded delete
//! - [`SaleRepository`](sale::SaleRepository) - Sale processor
//! - [`StockMovementRepository`](stock::StockMovementRepository) - Stock receipts
//! - [`StatsRepository`](stats::StatsRepository) - Dashboard counters

pub mod product;
pub mod sale;
pub mod stats;
pub mod stock;
