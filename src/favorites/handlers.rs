use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::models::{DeleteResponse, Favorite, FavoriteIdQuery, NewFavorite};
use super::service::FavoritesError;
use crate::AppState;

/// List saved cities, newest first
///
/// GET /favorites
pub async fn list_favorites(
    State(state): State<AppState>,
) -> Result<Json<Vec<Favorite>>, FavoritesError> {
    let favorites = state.favorites_service.list().await?;
    Ok(Json(favorites))
}

/// Save a city
///
/// POST /favorites
pub async fn create_favorite(
    State(state): State<AppState>,
    Json(request): Json<NewFavorite>,
) -> Result<(StatusCode, Json<Favorite>), FavoritesError> {
    let favorite = state.favorites_service.save(request).await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// DELETE /favorites?id=3
pub async fn delete_favorite_by_query(
    State(state): State<AppState>,
    Query(query): Query<FavoriteIdQuery>,
) -> Result<Json<DeleteResponse>, FavoritesError> {
    let id = query
        .id
        .ok_or_else(|| FavoritesError::Validation("query parameter 'id' is required".to_string()))?;
    state.favorites_service.remove(id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

/// DELETE /favorites/{id}
pub async fn delete_favorite(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, FavoritesError> {
    state.favorites_service.remove(id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
