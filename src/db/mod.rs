mod favorite_repo;
mod search_history_repo;
mod weather_cache_repo;

pub use favorite_repo::{FavoriteRepository, SqliteFavoriteRepository};
pub use search_history_repo::{SearchHistoryRepository, SqliteSearchHistoryRepository};
pub use weather_cache_repo::{CachedWeather, SqliteWeatherCacheRepository, WeatherCacheRepository};

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Database configuration
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/skycast.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Create and configure a SQLite connection pool
pub async fn create_pool(config: &DbConfig) -> Result<SqlitePool, DbError> {
    // Ensure the data directory exists
    if let Some(db_path) = config.url.strip_prefix("sqlite:") {
        if !db_path.starts_with(':') {
            if let Some(parent) = Path::new(db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        DbError::Migration(format!("Failed to create database directory: {}", e))
                    })?;
                }
            }
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&format!("{}?mode=rwc", config.url))
        .await?;

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    let migration_001 = include_str!("../../migrations/001_create_tables.sql");
    sqlx::raw_sql(migration_001).execute(pool).await?;

    let migration_002 = include_str!("../../migrations/002_create_weather_cache.sql");
    sqlx::raw_sql(migration_002).execute(pool).await?;

    tracing::info!("Database migrations completed");
    Ok(())
}

#[cfg(test)]
pub(crate) async fn setup_test_db() -> SqlitePool {
    let config = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    let pool = create_pool(&config).await.expect("Failed to create pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}
