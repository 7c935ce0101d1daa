//! `/api/sales` handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use stockroom_core::Sale;

use crate::dto::SaleRequest;
use crate::error::{ApiError, ApiResultExt};
use crate::state::AppState;

pub async fn list_sales(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Sale>>, ApiError> {
    let sales = state
        .db
        .sales()
        .list()
        .await
        .api_context("Error fetching sales")?;

    Ok(Json(sales))
}

/// Records a sale; 400 with `available`/`requested` when stock is short.
pub async fn create_sale(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SaleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Sale>), ApiError> {
    let Json(request) = payload?;

    let sale = state
        .db
        .sales()
        .record_sale(request.into())
        .await
        .api_context("Error recording sale")?;

    Ok((StatusCode::CREATED, Json(sale)))
}
