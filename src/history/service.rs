use axum::http::StatusCode;
use std::sync::Arc;
use thiserror::Error;

use super::models::{NewSearchEntry, SearchEntry};
use crate::clock::Clock;
use crate::db::{DbError, SearchHistoryRepository};
use crate::error::HttpError;
use crate::extractors::validate_coordinates;
use crate::impl_into_response;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Invalid search entry: {0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl HttpError for HistoryError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Validation(_) => Some("VALIDATION_ERROR"),
            Self::Database(_) => Some("DATABASE_ERROR"),
        }
    }
}

impl_into_response!(HistoryError);

/// Recently searched cities, one entry per city
pub struct HistoryService {
    repo: Arc<dyn SearchHistoryRepository>,
    clock: Arc<dyn Clock>,
    limit: u32,
}

impl HistoryService {
    pub fn new(repo: Arc<dyn SearchHistoryRepository>, clock: Arc<dyn Clock>, limit: u32) -> Self {
        Self { repo, clock, limit }
    }

    pub async fn recent(&self) -> Result<Vec<SearchEntry>, HistoryError> {
        Ok(self.repo.recent(self.limit).await?)
    }

    pub async fn record(&self, mut entry: NewSearchEntry) -> Result<SearchEntry, HistoryError> {
        entry.city = entry.city.trim().to_string();
        if entry.city.is_empty() {
            return Err(HistoryError::Validation("city must not be empty".to_string()));
        }
        validate_coordinates(entry.lat, entry.lon).map_err(HistoryError::Validation)?;

        let saved = self.repo.record(&entry, self.clock.now_timestamp()).await?;
        tracing::debug!(city = %saved.city, "Search recorded");
        Ok(saved)
    }

    /// Returns the number of entries removed
    pub async fn clear(&self) -> Result<usize, HistoryError> {
        let removed = self.repo.clear().await?;
        tracing::info!(removed = removed, "Search history cleared");
        Ok(removed)
    }
}
