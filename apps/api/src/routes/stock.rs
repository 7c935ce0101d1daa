//! `/api/stock` handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::dto::{StockAddedResponse, StockRequest};
use crate::error::{ApiError, ApiResultExt};
use crate::state::AppState;

pub async fn add_stock(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StockRequest>, JsonRejection>,
) -> Result<Json<StockAddedResponse>, ApiError> {
    let Json(request) = payload?;

    let movement = state
        .db
        .stock()
        .add_stock(request.into())
        .await
        .api_context("Error adding stock")?;

    Ok(Json(StockAddedResponse {
        message: "Stock added successfully",
        movement,
    }))
}
