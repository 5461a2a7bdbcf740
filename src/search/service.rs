use axum::http::StatusCode;
use std::sync::Arc;
use thiserror::Error;

use super::models::CityMatch;
use crate::cache::{normalize_cache_key, SearchCache};
use crate::error::HttpError;
use crate::impl_into_response;
use crate::openweather::{OpenWeatherClient, OpenWeatherError};

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Query parameter 'q' is required")]
    EmptyQuery,

    #[error(transparent)]
    Upstream(#[from] OpenWeatherError),
}

impl HttpError for SearchError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyQuery => StatusCode::BAD_REQUEST,
            Self::Upstream(e) => e.status_code(),
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::EmptyQuery => Some("MISSING_QUERY"),
            Self::Upstream(e) => e.error_code(),
        }
    }
}

impl_into_response!(SearchError);

pub struct SearchService {
    client: Arc<OpenWeatherClient>,
    cache: SearchCache,
}

impl SearchService {
    pub fn new(client: Arc<OpenWeatherClient>, cache: SearchCache) -> Self {
        Self { client, cache }
    }

    /// Places matching `query`. An empty upstream answer is a valid result.
    pub async fn search(&self, query: &str) -> Result<Vec<CityMatch>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let key = normalize_cache_key(query);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(query = %query, "Search cache hit");
            return Ok(hit);
        }

        let matches = self.client.search_cities(query).await?;
        tracing::info!(query = %query, results = matches.len(), "City search completed");

        self.cache.insert(key, matches.clone());
        Ok(matches)
    }
}
