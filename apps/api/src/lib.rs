//! # Stockroom API
//!
//! REST server for the Stockroom inventory: products, sales, stock receipts
//! and dashboard statistics over a single SQLite file.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP request                                                           │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  CorsLayer ─► TraceLayer ─► Router ─► handler(State<Arc<AppState>>)     │
//! │                                           │                             │
//! │                                           ▼                             │
//! │                              stockroom-db repositories                  │
//! │                                           │                             │
//! │                              Ok ─► Json(entity)                         │
//! │                              Err ─► ApiError { error, code, ... }       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use routes::create_router;
pub use state::AppState;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockroom=debug,sqlx=warn,tower_http=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
