//! Conversion history endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};
use omniconvert_core::ConversionRecord;

use crate::state::AppState;

/// Recent conversion attempts, newest first.
#[utoipa::path(
    get,
    path = "/api/v0/history",
    tag = "history",
    responses(
        (status = 200, description = "Conversion history", body = [ConversionRecord])
    )
)]
pub async fn list_history(State(state): State<Arc<AppState>>) -> Json<Vec<ConversionRecord>> {
    Json(state.history.list().await)
}
