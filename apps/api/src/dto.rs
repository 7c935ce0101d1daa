//! # Request and Response Bodies
//!
//! Requests are camelCase (`minStock`, `productId`). Entity responses are the
//! `stockroom-core` types themselves, serialized with row-style snake_case
//! keys; the envelopes below wrap them where a route adds a message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{Money, NewProduct, NewSale, NewStockEntry, StockMovement, DEFAULT_MIN_STOCK};

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST /api/products` and `PUT /api/products/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub price: Money,
    pub cost: Money,
    #[serde(default)]
    pub min_stock: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<ProductRequest> for NewProduct {
    fn from(req: ProductRequest) -> Self {
        NewProduct::new(req.name, req.category, req.quantity, req.price, req.cost)
            .min_stock(req.min_stock.unwrap_or(DEFAULT_MIN_STOCK))
            .notes(req.notes.unwrap_or_default())
    }
}

/// Body of `POST /api/sales`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    pub product_id: i64,
    pub quantity: i64,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub payment: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<SaleRequest> for NewSale {
    fn from(req: SaleRequest) -> Self {
        NewSale {
            product_id: req.product_id,
            quantity: req.quantity,
            customer: req.customer,
            payment: req.payment,
            notes: req.notes,
        }
    }
}

/// Body of `POST /api/stock/add`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRequest {
    pub product_id: i64,
    pub quantity: i64,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub cost: Option<Money>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<StockRequest> for NewStockEntry {
    fn from(req: StockRequest) -> Self {
        NewStockEntry {
            product_id: req.product_id,
            quantity: req.quantity,
            supplier: req.supplier,
            cost: req.cost,
            notes: req.notes,
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

/// `DELETE /api/products/{id}` confirmation.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: &'static str,
    /// Name of the removed product
    pub product: String,
}

/// `POST /api/stock/add` confirmation.
#[derive(Debug, Clone, Serialize)]
pub struct StockAddedResponse {
    pub message: &'static str,
    pub movement: StockMovement,
}

/// `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    /// Seconds since the process started
    pub uptime: f64,
}

/// `GET /` service metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub environment: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize)]
pub struct Endpoints {
    pub products: &'static str,
    pub sales: &'static str,
    pub stock: &'static str,
    pub stats: &'static str,
}
