use axum::{extract::State, http::StatusCode, Json};

use super::models::{ClearHistoryResponse, NewSearchEntry, SearchEntry};
use super::service::HistoryError;
use crate::AppState;

/// Most recent searches, newest first
///
/// GET /history
pub async fn list_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<SearchEntry>>, HistoryError> {
    let entries = state.history_service.recent().await?;
    Ok(Json(entries))
}

/// POST /history
pub async fn record_search(
    State(state): State<AppState>,
    Json(request): Json<NewSearchEntry>,
) -> Result<(StatusCode, Json<SearchEntry>), HistoryError> {
    let entry = state.history_service.record(request).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /history
pub async fn clear_history(
    State(state): State<AppState>,
) -> Result<Json<ClearHistoryResponse>, HistoryError> {
    let removed = state.history_service.clear().await?;
    Ok(Json(ClearHistoryResponse {
        success: true,
        removed,
    }))
}
