use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::classify::{AirQualityClass, AirQualityLevel};
use crate::error::ErrorResponse;
use crate::favorites::models::{DeleteResponse, Favorite, NewFavorite};
use crate::forecast::models::{
    AirQualityReport, DailySummary, ForecastResponse, HourlySummary, PollutantComponents,
};
use crate::history::models::{ClearHistoryResponse, NewSearchEntry, SearchEntry};
use crate::search::models::CityMatch;
use crate::units::TemperatureUnit;
use crate::weather::handlers::HealthResponse;
use crate::weather::models::CurrentConditions;

/// OpenAPI documentation for the SkyCast API
///
/// Schema-only; handlers carry their route in their doc comments.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SkyCast API",
        version = "1.0.0",
        description = "Weather dashboard backend on OpenWeatherMap: current conditions, 7-day and 24-hour forecast rollups, air quality, city search, favorites and search history.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    tags(
        (name = "weather", description = "Current conditions"),
        (name = "forecast", description = "Daily and hourly forecast summaries with air quality"),
        (name = "search", description = "City search"),
        (name = "favorites", description = "Saved cities"),
        (name = "history", description = "Recent searches")
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            TemperatureUnit,
            CurrentConditions,
            ForecastResponse,
            DailySummary,
            HourlySummary,
            AirQualityReport,
            AirQualityClass,
            AirQualityLevel,
            PollutantComponents,
            CityMatch,
            Favorite,
            NewFavorite,
            DeleteResponse,
            SearchEntry,
            NewSearchEntry,
            ClearHistoryResponse,
        )
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_are_registered() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;

        for name in ["ForecastResponse", "CurrentConditions", "Favorite", "ErrorResponse"] {
            assert!(schemas.contains_key(name), "missing schema {}", name);
        }
    }
}
