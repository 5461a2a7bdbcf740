use axum::{
    routing::{delete, get},
    Router,
};

use crate::favorites::handlers as favorites_handlers;
use crate::forecast::handlers as forecast_handlers;
use crate::history::handlers as history_handlers;
use crate::openapi::swagger_ui;
use crate::search::handlers as search_handlers;
use crate::weather::handlers as weather_handlers;
use crate::AppState;

/// Build the weather API routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/weather", get(weather_handlers::get_weather))
        .route("/weather/{city}", get(weather_handlers::get_weather))
}

/// Build the forecast API routes
fn forecast_routes() -> Router<AppState> {
    Router::new()
        .route("/forecast", get(forecast_handlers::get_forecast))
        .route("/forecast/{city}", get(forecast_handlers::get_forecast))
}

fn search_routes() -> Router<AppState> {
    Router::new().route("/search", get(search_handlers::search_cities))
}

/// Build the favorites API routes
fn favorites_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/favorites",
            get(favorites_handlers::list_favorites)
                .post(favorites_handlers::create_favorite)
                .delete(favorites_handlers::delete_favorite_by_query),
        )
        .route(
            "/favorites/{id}",
            delete(favorites_handlers::delete_favorite),
        )
}

/// Build the search history API routes
fn history_routes() -> Router<AppState> {
    Router::new().route(
        "/history",
        get(history_handlers::list_history)
            .post(history_handlers::record_search)
            .delete(history_handlers::clear_history),
    )
}

/// Build all dashboard API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(weather_routes())
        .merge(forecast_routes())
        .merge(search_routes())
        .merge(favorites_routes())
        .merge(history_routes())
}

/// Build the complete application router
pub fn build_router() -> Router<AppState> {
    Router::new()
        // Health check at root level
        .route("/", get(weather_handlers::health))
        .route("/health", get(weather_handlers::health))
        .nest("/api", api_routes())
        // Swagger UI for API documentation
        .merge(swagger_ui())
}
