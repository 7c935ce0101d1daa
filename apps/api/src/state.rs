//! Shared application state handed to every handler.

use std::time::Instant;

use stockroom_db::Database;

/// State shared by all handlers as `State<Arc<AppState>>`.
///
/// The database pool is the only shared mutable resource; nothing else is
/// cached in process.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,

    /// Deployment label reported by `GET /`
    pub environment: String,

    /// Process start, for `GET /health` uptime
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db: Database, environment: impl Into<String>) -> Self {
        AppState {
            db,
            environment: environment.into(),
            started_at: Instant::now(),
        }
    }
}
