//! `/api/products` handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use stockroom_core::validation::parse_id;
use stockroom_core::Product;

use crate::dto::{DeleteResponse, ProductRequest};
use crate::error::{ApiError, ApiResultExt};
use crate::state::AppState;

pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state
        .db
        .products()
        .list()
        .await
        .api_context("Error fetching products")?;

    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id)?;

    let product = state
        .db
        .products()
        .require(id)
        .await
        .api_context("Error fetching product")?;

    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(request) = payload?;

    let product = state
        .db
        .products()
        .create(request.into())
        .await
        .api_context("Error creating product")?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Full replace of every editable field.
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;

    let product = state
        .db
        .products()
        .update(id, request.into())
        .await
        .api_context("Error updating product")?;

    Ok(Json(product))
}

/// Refused with 400 while any sale references the product.
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_id(&id)?;

    let deleted = state
        .db
        .products()
        .delete(id)
        .await
        .api_context_with_details("Error deleting product")?;

    Ok(Json(DeleteResponse {
        success: true,
        message: "Product deleted successfully",
        product: deleted.name,
    }))
}
