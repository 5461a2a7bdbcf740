mod cache;
mod classify;
mod clock;
mod config;
mod db;
mod error;
mod extractors;
mod favorites;
mod forecast;
mod history;
mod openapi;
mod openweather;
mod routes;
mod search;
mod units;
mod weather;

use axum::{error_handling::HandleErrorLayer, http::StatusCode, BoxError};
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cache::{create_search_cache, start_cache_cleanup_task};
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::db::{
    create_pool, run_migrations, DbConfig, SqliteFavoriteRepository,
    SqliteSearchHistoryRepository, SqliteWeatherCacheRepository,
};
use crate::favorites::FavoritesService;
use crate::forecast::ForecastService;
use crate::history::HistoryService;
use crate::openweather::OpenWeatherClient;
use crate::search::SearchService;
use crate::weather::WeatherService;

/// Shared HTTP client configuration
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Whole-request budget; a forecast makes up to three upstream calls
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct AppState {
    pub weather_service: Arc<WeatherService>,
    pub forecast_service: Arc<ForecastService>,
    pub search_service: Arc<SearchService>,
    pub favorites_service: Arc<FavoritesService>,
    pub history_service: Arc<HistoryService>,
    pub config: Arc<AppConfig>,
}

/// Create shared HTTP client with connection pooling
fn create_http_client(config: &AppConfig) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(config.http_timeout())
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .pool_max_idle_per_host(10)
        .build()
}

/// Handle request timeout errors
async fn handle_timeout_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {}", err),
        )
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl+c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to listen for SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skycast=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    let grouping_zone = config.grouping_zone()?;
    tracing::info!(
        units = %config.units,
        default_city = ?config.default_city,
        grouping_timezone = ?config.grouping_timezone,
        "Configuration loaded successfully"
    );

    // Database
    let pool = create_pool(&DbConfig {
        url: config.database_url.clone(),
        ..DbConfig::default()
    })
    .await?;
    run_migrations(&pool).await?;
    tracing::info!(url = %config.database_url, "Database ready");

    // Shared upstream client
    let http_client = create_http_client(&config)?;
    let client = Arc::new(OpenWeatherClient::with_base_urls(
        http_client,
        &config.openweathermap_api_key,
        &config.api_base_url,
        &config.geo_base_url,
    ));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let search_cache = create_search_cache(clock.clone());
    start_cache_cleanup_task(search_cache.clone());

    let state = AppState {
        weather_service: Arc::new(WeatherService::new(
            client.clone(),
            Arc::new(SqliteWeatherCacheRepository::new(pool.clone())),
            clock.clone(),
            config.cache_ttl(),
        )),
        forecast_service: Arc::new(ForecastService::new(client.clone(), grouping_zone)),
        search_service: Arc::new(SearchService::new(client, search_cache)),
        favorites_service: Arc::new(FavoritesService::new(
            Arc::new(SqliteFavoriteRepository::new(pool.clone())),
            clock.clone(),
        )),
        history_service: Arc::new(HistoryService::new(
            Arc::new(SqliteSearchHistoryRepository::new(pool)),
            clock,
            config.history_limit,
        )),
        config: Arc::new(config.clone()),
    };

    let app = routes::build_router()
        .layer(
            ServiceBuilder::new()
                // Handle timeout errors
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS)),
        )
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
