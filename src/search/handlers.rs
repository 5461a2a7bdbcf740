use axum::{
    extract::{Query, State},
    Json,
};

use super::models::{CityMatch, SearchQuery};
use super::service::SearchError;
use crate::AppState;

/// City search
///
/// GET /search?q=Springfield
pub async fn search_cities(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CityMatch>>, SearchError> {
    let q = query.q.unwrap_or_default();
    let matches = state.search_service.search(&q).await?;
    Ok(Json(matches))
}
