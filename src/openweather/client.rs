use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::models::{
    AirPollutionPayload, CurrentWeatherPayload, ErrorPayload, ForecastPayload, ForecastSamples,
    GeoLocation,
};
use super::OpenWeatherError;
use crate::forecast::models::AirQualityReport;
use crate::search::models::CityMatch;
use crate::weather::models::CurrentConditions;

pub const DEFAULT_API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEO_BASE_URL: &str = "https://api.openweathermap.org/geo/1.0";

/// Forecast points requested: 40 x 3h = 5 days
const FORECAST_POINTS: &str = "40";

/// Matches returned by a city search
const SEARCH_LIMIT: &str = "5";

/// Thin typed wrapper over the OpenWeatherMap REST endpoints.
///
/// Everything is fetched in metric units; conversion to the caller's display
/// unit happens after aggregation.
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    api_base_url: String,
    geo_base_url: String,
}

impl OpenWeatherClient {
    pub fn with_base_urls(
        client: Client,
        api_key: &str,
        api_base_url: &str,
        geo_base_url: &str,
    ) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            geo_base_url: geo_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Current conditions by city name
    pub async fn current_by_city(&self, city: &str) -> Result<CurrentConditions, OpenWeatherError> {
        tracing::debug!(city = %city, "Fetching current weather");

        let url = format!("{}/weather", self.api_base_url);
        let payload: CurrentWeatherPayload = self
            .get_json(&url, &[("q", city.to_string()), ("units", "metric".to_string())])
            .await?;

        payload.try_into()
    }

    /// Current conditions by coordinates
    pub async fn current_by_coords(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentConditions, OpenWeatherError> {
        tracing::debug!(lat = %lat, lon = %lon, "Fetching current weather");

        let url = format!("{}/weather", self.api_base_url);
        let payload: CurrentWeatherPayload = self
            .get_json(
                &url,
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        payload.try_into()
    }

    /// 5-day / 3-hour forecast mapped into aggregator samples
    pub async fn forecast(&self, lat: f64, lon: f64) -> Result<ForecastSamples, OpenWeatherError> {
        tracing::debug!(lat = %lat, lon = %lon, "Fetching 3-hourly forecast");

        let url = format!("{}/forecast", self.api_base_url);
        let payload: ForecastPayload = self
            .get_json(
                &url,
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("units", "metric".to_string()),
                    ("cnt", FORECAST_POINTS.to_string()),
                ],
            )
            .await?;

        let forecast = ForecastSamples::try_from(payload)?;
        tracing::debug!(samples = forecast.samples.len(), "Forecast samples mapped");
        Ok(forecast)
    }

    /// Current air pollution at the given coordinates
    pub async fn air_pollution(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<AirQualityReport, OpenWeatherError> {
        tracing::debug!(lat = %lat, lon = %lon, "Fetching air pollution");

        let url = format!("{}/air_pollution", self.api_base_url);
        let payload: AirPollutionPayload = self
            .get_json(&url, &[("lat", lat.to_string()), ("lon", lon.to_string())])
            .await?;

        payload.try_into()
    }

    /// Up to five places matching a free-text query
    pub async fn search_cities(&self, query: &str) -> Result<Vec<CityMatch>, OpenWeatherError> {
        tracing::debug!(query = %query, "Searching cities");

        let url = format!("{}/direct", self.geo_base_url);
        let locations: Vec<GeoLocation> = self
            .get_json(&url, &[("q", query.to_string()), ("limit", SEARCH_LIMIT.to_string())])
            .await?;

        Ok(locations.into_iter().map(CityMatch::from).collect())
    }

    /// Resolve a city name to its best match
    pub async fn geocode(&self, city: &str) -> Result<CityMatch, OpenWeatherError> {
        self.search_cities(city)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| OpenWeatherError::CityNotFound(city.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, OpenWeatherError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("appid", &self.api_key)])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, url = %url, "Received OpenWeatherMap response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(OpenWeatherError::Unauthorized);
        }

        if status == StatusCode::NOT_FOUND {
            let location = params
                .iter()
                .find(|(key, _)| *key == "q")
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| "requested location".to_string());
            return Err(OpenWeatherError::CityNotFound(location));
        }

        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorPayload>(&body)
                .map(|e| e.message)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            // Throttling and outages are upstream faults, not bad requests
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                return Err(OpenWeatherError::Unavailable {
                    status: status.as_u16(),
                    message,
                });
            }
            return Err(OpenWeatherError::ApiError(message));
        }

        serde_json::from_str(&body).map_err(|e| OpenWeatherError::InvalidResponse(e.to_string()))
    }
}
