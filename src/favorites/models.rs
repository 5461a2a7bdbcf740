use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A saved city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Favorite {
    pub id: i64,
    pub city: String,
    /// ISO country code, empty when unknown
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    /// Unix seconds
    pub created_at: i64,
}

/// Request to save a city; an existing (city, country) pair is updated
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewFavorite {
    pub city: String,
    #[serde(default)]
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// `DELETE /favorites?id=`
#[derive(Debug, Deserialize)]
pub struct FavoriteIdQuery {
    pub id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}
