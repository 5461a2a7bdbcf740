use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::history::{NewSearchEntry, SearchEntry};

use super::DbError;

/// Repository trait for the search history
#[async_trait]
pub trait SearchHistoryRepository: Send + Sync {
    /// Most recent searches, newest first
    async fn recent(&self, limit: u32) -> Result<Vec<SearchEntry>, DbError>;

    /// Record a search, replacing any earlier entry for the same city
    async fn record(&self, entry: &NewSearchEntry, created_at: i64)
        -> Result<SearchEntry, DbError>;

    /// Remove every entry; returns how many were removed
    async fn clear(&self) -> Result<usize, DbError>;
}

/// SQLite implementation of SearchHistoryRepository
pub struct SqliteSearchHistoryRepository {
    pool: SqlitePool,
}

impl SqliteSearchHistoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Internal row structure for SQLite queries
#[derive(sqlx::FromRow)]
struct SearchRow {
    id: i64,
    city: String,
    country: String,
    lat: f64,
    lon: f64,
    created_at: i64,
}

impl From<SearchRow> for SearchEntry {
    fn from(row: SearchRow) -> Self {
        SearchEntry {
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
impl SearchHistoryRepository for SqliteSearchHistoryRepository {
    async fn recent(&self, limit: u32) -> Result<Vec<SearchEntry>, DbError> {
        let rows: Vec<SearchRow> = sqlx::query_as(
            "SELECT id, city, country, lat, lon, created_at
             FROM search_history
             ORDER BY created_at DESC, id DESC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn record(
        &self,
        entry: &NewSearchEntry,
        created_at: i64,
    ) -> Result<SearchEntry, DbError> {
        let mut tx = self.pool.begin().await?;

        let replaced = sqlx::query("DELETE FROM search_history WHERE city = ?")
            .bind(&entry.city)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let row: SearchRow = sqlx::query_as(
            "INSERT INTO search_history (city, country, lat, lon, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id, city, country, lat, lon, created_at",
        )
        .bind(&entry.city)
        .bind(entry.country.as_deref().unwrap_or_default())
        .bind(entry.lat)
        .bind(entry.lon)
        .bind(created_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        if replaced > 0 {
            tracing::debug!(city = %entry.city, "Replaced earlier search history entry");
        }

        Ok(row.into())
    }

    async fn clear(&self) -> Result<usize, DbError> {
        let result = sqlx::query("DELETE FROM search_history")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_test_db;

    fn search(city: &str) -> NewSearchEntry {
        NewSearchEntry {
            city: city.to_string(),
            country: Some("US".to_string()),
            lat: 41.8781,
            lon: -87.6298,
        }
    }

    #[tokio::test]
    async fn test_record_and_recent_order() {
        let repo = SqliteSearchHistoryRepository::new(setup_test_db().await);

        repo.record(&search("Chicago"), 1000).await.unwrap();
        repo.record(&search("Boston"), 2000).await.unwrap();
        repo.record(&search("Denver"), 3000).await.unwrap();

        let recent = repo.recent(20).await.unwrap();
        let cities: Vec<&str> = recent.iter().map(|e| e.city.as_str()).collect();
        assert_eq!(cities, vec!["Denver", "Boston", "Chicago"]);
    }

    #[tokio::test]
    async fn test_repeat_search_moves_to_top() {
        let repo = SqliteSearchHistoryRepository::new(setup_test_db().await);

        repo.record(&search("Chicago"), 1000).await.unwrap();
        repo.record(&search("Boston"), 2000).await.unwrap();
        repo.record(&search("Chicago"), 3000).await.unwrap();

        let recent = repo.recent(20).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].city, "Chicago");
        assert_eq!(recent[0].created_at, 3000);
        assert_eq!(recent[1].city, "Boston");
    }

    #[tokio::test]
    async fn test_recent_respects_limit() {
        let repo = SqliteSearchHistoryRepository::new(setup_test_db().await);

        for i in 0..25 {
            repo.record(&search(&format!("City {i}")), 1000 + i)
                .await
                .unwrap();
        }

        let recent = repo.recent(20).await.unwrap();
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0].city, "City 24");
    }

    #[tokio::test]
    async fn test_clear() {
        let repo = SqliteSearchHistoryRepository::new(setup_test_db().await);

        repo.record(&search("Chicago"), 1000).await.unwrap();
        repo.record(&search("Boston"), 2000).await.unwrap();

        assert_eq!(repo.clear().await.unwrap(), 2);
        assert!(repo.recent(20).await.unwrap().is_empty());
        assert_eq!(repo.clear().await.unwrap(), 0);
    }
}
