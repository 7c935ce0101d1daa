//! # Routes
//!
//! Routing table for the Stockroom API.
//!
//! ```text
//! GET    /                       service metadata
//! GET    /health                 liveness + uptime
//! GET    /api/products           list (newest first)
//! POST   /api/products           create                    201
//! GET    /api/products/{id}      fetch                     404
//! PUT    /api/products/{id}      full replace              404
//! DELETE /api/products/{id}      guarded delete            404 / 400 has sales
//! GET    /api/sales              list (newest first)
//! POST   /api/sales              record sale               201 / 404 / 400 stock
//! POST   /api/stock/add          receive stock             404
//! GET    /api/stats              dashboard counters
//! *                              {"error": "Route not found", path, method}
//! ```

pub mod meta;
pub mod products;
pub mod sales;
pub mod stats;
pub mod stock;

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Creates the API router with all routes and middleware.
///
/// ```rust,ignore
/// let router = create_router(Arc::new(AppState::new(db, "production")));
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
/// axum::serve(listener, router).await?;
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    let api: Router<Arc<AppState>> = Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/sales", get(sales::list_sales).post(sales::create_sale))
        .route("/stock/add", post(stock::add_stock))
        .route("/stats", get(stats::get_stats));

    Router::new()
        .route("/", get(meta::service_info))
        .route("/health", get(meta::health))
        .nest("/api", api)
        .fallback(meta::route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state)
}

/// Any origin; the methods and headers the web client uses.
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// Tests
// =============================================================================
