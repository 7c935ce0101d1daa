//! # Database Error Types
//!
//! One error type leaves every repository call, whether SQLite refused the
//! statement or a business rule refused the request.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error ─────────► classify ──┬─► UniqueViolation                  │
//! │                                    ├─► ForeignKeyViolation              │
//! │                                    ├─► CheckViolation  (quantity >= 0)  │
//! │                                    ├─► Overflow        (SUM past i64)   │
//! │                                    ├─► PoolExhausted / ConnectionFailed │
//! │                                    └─► QueryFailed / Internal           │
//! │                                                                         │
//! │  CoreError ───────────► DbError::Core  (passes through untouched)      │
//! │  ValidationError ─────► DbError::Core(CoreError::Validation)           │
//! │                                                                         │
//! │  Inside a unit of work any of these rolls the transaction back.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stockroom_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    /// Business rejection raised inside a repository: unknown product,
    /// short stock, delete blocked by sales, bad input.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// `fetch_one` found nothing where a repository didn't expect to look.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A sale or movement pointing at a product that is gone.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A write that would push `products.quantity` below zero, or a sale
    /// with a non-positive quantity.
    #[error("Check constraint violation: {message}")]
    CheckViolation { message: String },

    /// An aggregate no longer fits in a 64-bit integer.
    #[error("Numeric overflow: {0}")]
    Overflow(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// BEGIN, COMMIT or ROLLBACK itself failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// No connection freed up within `connect_timeout`.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Maps SQLite's constraint messages onto variants.
    ///
    /// ```text
    /// UNIQUE constraint failed: products.name  → UniqueViolation { field: "products.name" }
    /// FOREIGN KEY constraint failed            → ForeignKeyViolation
    /// CHECK constraint failed: quantity >= 0   → CheckViolation
    /// integer overflow                         → Overflow
    /// anything else                            → QueryFailed
    /// ```
    fn from_sqlite_message(message: &str) -> Self {
        if let Some(field) = message.strip_prefix("UNIQUE constraint failed: ") {
            return DbError::UniqueViolation {
                field: field.to_string(),
                value: "unknown".to_string(),
            };
        }

        let message = message.to_string();
        if message.contains("FOREIGN KEY constraint failed") {
            DbError::ForeignKeyViolation { message }
        } else if message.contains("CHECK constraint failed") {
            DbError::CheckViolation { message }
        } else if message.contains("integer overflow") {
            DbError::Overflow(message)
        } else {
            DbError::QueryFailed(message)
        }
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        DbError::Core(CoreError::Validation(err))
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::from_sqlite_message(db_err.message()),
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}
