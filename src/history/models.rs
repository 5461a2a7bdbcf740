use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One remembered search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchEntry {
    pub id: i64,
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    /// Unix seconds
    pub created_at: i64,
}

/// Request to record a search
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewSearchEntry {
    pub city: String,
    #[serde(default)]
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearHistoryResponse {
    pub success: bool,
    pub removed: usize,
}
