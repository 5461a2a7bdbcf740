use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::weather::CurrentConditions;

use super::DbError;

/// A cached current-conditions snapshot
#[derive(Debug, Clone)]
pub struct CachedWeather {
    /// Normalized city query, e.g. `"london,gb"`
    pub city: String,
    pub data: CurrentConditions,
    pub cached_at: i64,
    pub expires_at: i64,
}

/// Repository trait for the current-conditions cache
#[async_trait]
pub trait WeatherCacheRepository: Send + Sync {
    /// Snapshot for `city` that is still valid at `now`
    async fn get_fresh(&self, city: &str, now: i64) -> Result<Option<CachedWeather>, DbError>;

    /// Insert or overwrite the snapshot for `city`
    async fn put(&self, entry: &CachedWeather) -> Result<(), DbError>;
}

/// SQLite implementation of WeatherCacheRepository
pub struct SqliteWeatherCacheRepository {
    pool: SqlitePool,
}

impl SqliteWeatherCacheRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CacheRow {
    city: String,
    data: String,
    cached_at: i64,
    expires_at: i64,
}

#[async_trait]
impl WeatherCacheRepository for SqliteWeatherCacheRepository {
    async fn get_fresh(&self, city: &str, now: i64) -> Result<Option<CachedWeather>, DbError> {
        let row: Option<CacheRow> = sqlx::query_as(
            "SELECT city, data, cached_at, expires_at
             FROM weather_cache
             WHERE city = ? AND expires_at > ?",
        )
        .bind(city)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(CachedWeather {
                data: serde_json::from_str(&r.data)?,
                city: r.city,
                cached_at: r.cached_at,
                expires_at: r.expires_at,
            })
        })
        .transpose()
    }

    async fn put(&self, entry: &CachedWeather) -> Result<(), DbError> {
        let data = serde_json::to_string(&entry.data)?;

        sqlx::query(
            "INSERT INTO weather_cache (city, data, cached_at, expires_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (city) DO UPDATE SET
                data = excluded.data,
                cached_at = excluded.cached_at,
                expires_at = excluded.expires_at",
        )
        .bind(&entry.city)
        .bind(data)
        .bind(entry.cached_at)
        .bind(entry.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
