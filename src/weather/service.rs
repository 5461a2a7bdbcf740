use axum::http::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::models::CurrentConditions;
use crate::cache::normalize_cache_key;
use crate::clock::Clock;
use crate::db::{CachedWeather, WeatherCacheRepository};
use crate::error::HttpError;
use crate::extractors::Location;
use crate::impl_into_response;
use crate::openweather::{OpenWeatherClient, OpenWeatherError};
use crate::units::TemperatureUnit;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error(transparent)]
    Upstream(#[from] OpenWeatherError),
}

impl HttpError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Upstream(e) => e.status_code(),
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Upstream(e) => e.error_code(),
        }
    }
}

impl_into_response!(WeatherError);

/// Current conditions with a read-through, fixed-TTL snapshot cache.
///
/// Only by-city requests use the cache. Snapshots are keyed by the normalized
/// query as the caller sent it (`"london,gb"` and `"london"` are distinct)
/// and stored in Celsius. Cache failures never fail a request.
pub struct WeatherService {
    client: Arc<OpenWeatherClient>,
    cache: Arc<dyn WeatherCacheRepository>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl WeatherService {
    pub fn new(
        client: Arc<OpenWeatherClient>,
        cache: Arc<dyn WeatherCacheRepository>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            client,
            cache,
            clock,
            ttl,
        }
    }

    pub async fn get_current(
        &self,
        location: &Location,
        units: TemperatureUnit,
    ) -> Result<CurrentConditions, WeatherError> {
        let current = match location {
            Location::City(query) => {
                let key = normalize_cache_key(query);
                if let Some(cached) = self.cached(&key).await {
                    tracing::debug!(key = %key, "Current weather cache hit");
                    return Ok(cached.in_unit(units));
                }
                let current = self.client.current_by_city(query).await?;
                self.store(key, &current).await;
                current
            }
            // Never cached: the reported name may resolve elsewhere by query
            Location::Coords { lat, lon } => self.client.current_by_coords(*lat, *lon).await?,
        };

        tracing::info!(
            city = %current.city,
            country = %current.country,
            temp = current.temperature,
            "Current weather fetched"
        );

        Ok(current.in_unit(units))
    }

    async fn cached(&self, key: &str) -> Option<CurrentConditions> {
        match self.cache.get_fresh(key, self.clock.now_timestamp()).await {
            Ok(hit) => hit.map(|entry| entry.data),
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Weather cache read failed");
                None
            }
        }
    }

    async fn store(&self, key: String, current: &CurrentConditions) {
        let now = self.clock.now_timestamp();
        let entry = CachedWeather {
            city: key,
            data: current.clone(),
            cached_at: now,
            expires_at: now + self.ttl.as_secs() as i64,
        };

        if let Err(e) = self.cache.put(&entry).await {
            tracing::warn!(error = %e, key = %entry.city, "Weather cache write failed");
        }
    }
}
