use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::models::CurrentConditions;
use super::service::WeatherError;
use crate::extractors::LocationQuery;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Current conditions
///
/// GET /weather?city=London | /weather?lat=51.5&lon=-0.12 | /weather/{city}, optional units=metric|imperial
pub async fn get_weather(
    State(state): State<AppState>,
    LocationQuery { location, units }: LocationQuery,
) -> Result<Json<CurrentConditions>, WeatherError> {
    let weather = state.weather_service.get_current(&location, units).await?;
    Ok(Json(weather))
}
