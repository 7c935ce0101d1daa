//! `/api/stats` handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use stockroom_core::InventoryStats;

use crate::error::{ApiError, ApiResultExt};
use crate::state::AppState;

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<InventoryStats>, ApiError> {
    let stats = state
        .db
        .stats()
        .summary()
        .await
        .api_context_with_details("Error fetching statistics")?;

    Ok(Json(stats))
}
