//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Stockroom                              │
//! │                                                                         │
//! │  Handler: Result<Json<T>, ApiError>                                    │
//! │         │                                                               │
//! │         ├── JsonRejection / bad id ─────────► VALIDATION_ERROR   400    │
//! │         │                                                               │
//! │         ├── CoreError::ProductNotFound ─────► NOT_FOUND          404    │
//! │         ├── CoreError::ProductHasSales ─────► HAS_SALES          400    │
//! │         ├── CoreError::InsufficientStock ───► INSUFFICIENT_STOCK 400    │
//! │         │                                     + available, requested    │
//! │         │                                                               │
//! │         ├── DbError::Internal ──────────────► INTERNAL           500    │
//! │         └── DbError (anything else) ────────► DATABASE_ERROR     500    │
//! │                  │                             message replaced by the  │
//! │                  └── logged with tracing       route's context          │
//! │                                                                         │
//! │  Body: { "error": "...", "code": "...", ...optional fields }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use stockroom_core::{CoreError, ValidationError};
use stockroom_db::DbError;

/// API error returned from handlers.
///
/// ## Serialization
/// This is what the client receives when a request fails:
/// ```json
/// {
///   "error": "Insufficient stock",
///   "code": "INSUFFICIENT_STOCK",
///   "available": 7,
///   "requested": 999
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Human-readable error message for display
    #[serde(rename = "error")]
    pub message: String,

    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<i64>,

    /// Underlying failure, attached by routes that expose it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product not found (404)
    NotFound,

    /// Malformed body, bad id or rejected input (400)
    ValidationError,

    /// Product deletion blocked by recorded sales (400)
    HasSales,

    /// Sale quantity exceeds stock (400)
    InsufficientStock,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,

    /// No route matches the request (404)
    RouteNotFound,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound | ErrorCode::RouteNotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::HasSales | ErrorCode::InsufficientStock => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            code,
            available: None,
            requested: None,
            details: None,
            path: None,
            method: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found", resource))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates the unknown-route error.
    pub fn route_not_found(method: impl Into<String>, path: impl Into<String>) -> Self {
        ApiError {
            path: Some(path.into()),
            method: Some(method.into()),
            ..ApiError::new(ErrorCode::RouteNotFound, "Route not found")
        }
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }

    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Core(core) => ApiError::from(core),
            DbError::NotFound { entity, .. } => ApiError::not_found(&entity),
            DbError::UniqueViolation { field, value } => ApiError::validation(format!(
                "{} '{}' already exists",
                field, value
            )),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::CheckViolation { message } => {
                tracing::error!("Check constraint violation: {}", message);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Schema bootstrap failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::Overflow(e) => {
                tracing::error!("Numeric overflow: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Totals too large to compute")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::Internal, "Internal server error")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(_) => ApiError::not_found("Product"),
            CoreError::InsufficientStock {
                available,
                requested,
                ..
            } => ApiError {
                available: Some(available),
                requested: Some(requested),
                ..ApiError::new(ErrorCode::InsufficientStock, "Insufficient stock")
            },
            err @ CoreError::ProductHasSales { .. } => {
                ApiError::new(ErrorCode::HasSales, err.to_string())
            }
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Unparsable JSON, wrong content type or missing fields.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

// =============================================================================
// Route context
// =============================================================================

/// Replaces the message of server-side failures with a route-specific one.
///
/// Client errors (404, 400) keep their own message.
///
/// ```rust,ignore
/// let products = state.db.products().list().await.api_context("Error fetching products")?;
/// ```
pub trait ApiResultExt<T> {
    fn api_context(self, message: &str) -> Result<T, ApiError>;

    /// Like [`api_context`](ApiResultExt::api_context), also attaching the
    /// underlying error text as `details`.
    fn api_context_with_details(self, message: &str) -> Result<T, ApiError>;
}

impl<T, E> ApiResultExt<T> for Result<T, E>
where
    E: Into<ApiError> + fmt::Display,
{
    fn api_context(self, message: &str) -> Result<T, ApiError> {
        self.map_err(|err| {
            let mut api: ApiError = err.into();
            if api.is_server_error() {
                api.message = message.to_string();
            }
            api
        })
    }

    fn api_context_with_details(self, message: &str) -> Result<T, ApiError> {
        self.map_err(|err| {
            let details = err.to_string();
            let mut api: ApiError = err.into();
            if api.is_server_error() {
                api.message = message.to_string();
                api.details = Some(details);
            }
            api
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
