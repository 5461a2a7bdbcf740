use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::favorites::{Favorite, NewFavorite};

use super::DbError;

/// Repository trait for saved cities
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// All favorites, newest first
    async fn list(&self) -> Result<Vec<Favorite>, DbError>;

    /// Insert, or refresh the coordinates of an existing (city, country) pair
    async fn upsert(&self, favorite: &NewFavorite, created_at: i64) -> Result<Favorite, DbError>;

    /// Remove a favorite by id
    async fn remove(&self, id: i64) -> Result<bool, DbError>;
}

/// SQLite implementation of FavoriteRepository
pub struct SqliteFavoriteRepository {
    pool: SqlitePool,
}

impl SqliteFavoriteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Internal row structure for SQLite queries
#[derive(sqlx::FromRow)]
struct FavoriteRow {
    id: i64,
    city: String,
    country: String,
    lat: f64,
    lon: f64,
    created_at: i64,
}

impl From<FavoriteRow> for Favorite {
    fn from(row: FavoriteRow) -> Self {
        Favorite {
            id: row.id,
            city: row.city,
            country: row.country,
            lat: row.lat,
            lon: row.lon,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl FavoriteRepository for SqliteFavoriteRepository {
    async fn list(&self) -> Result<Vec<Favorite>, DbError> {
        let rows: Vec<FavoriteRow> = sqlx::query_as(
            "SELECT id, city, country, lat, lon, created_at
             FROM favorite_cities
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn upsert(&self, favorite: &NewFavorite, created_at: i64) -> Result<Favorite, DbError> {
        let row: FavoriteRow = sqlx::query_as(
            "INSERT INTO favorite_cities (city, country, lat, lon, created_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (city, country) DO UPDATE SET
                lat = excluded.lat,
                lon = excluded.lon
             RETURNING id, city, country, lat, lon, created_at",
        )
        .bind(&favorite.city)
        .bind(favorite.country.as_deref().unwrap_or_default())
        .bind(favorite.lat)
        .bind(favorite.lon)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn remove(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM favorite_cities WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
