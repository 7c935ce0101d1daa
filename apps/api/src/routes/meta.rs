//! Service metadata, health and the unknown-route fallback.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, Uri};
use axum::Json;
use chrono::Utc;
use tracing::warn;

use crate::dto::{Endpoints, HealthResponse, ServiceInfo};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Stockroom inventory API",
        status: "Online",
        version: env!("CARGO_PKG_VERSION"),
        database: "SQLite",
        environment: state.environment.clone(),
        endpoints: Endpoints {
            products: "/api/products",
            sales: "/api/sales",
            stock: "/api/stock/add",
            stats: "/api/stats",
        },
    })
}

/// Liveness only; does not touch the database.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

pub async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    warn!(%method, path = %uri.path(), "Route not found");
    ApiError::route_not_found(method.as_str(), uri.path())
}
