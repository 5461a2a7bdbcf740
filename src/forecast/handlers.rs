use axum::{extract::State, Json};

use super::models::ForecastResponse;
use super::service::ForecastError;
use crate::extractors::LocationQuery;
use crate::AppState;

/// Daily rollups (up to 7 days), the next 24 hours and current air quality
///
/// GET /forecast?lat=41.88&lon=-87.63 | /forecast?city=Chicago | /forecast/{city}, optional units=metric|imperial
pub async fn get_forecast(
    State(state): State<AppState>,
    LocationQuery { location, units }: LocationQuery,
) -> Result<Json<ForecastResponse>, ForecastError> {
    let forecast = state.forecast_service.get_forecast(&location, units).await?;
    Ok(Json(forecast))
}
