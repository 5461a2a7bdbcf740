use axum::http::StatusCode;
use chrono::FixedOffset;
use std::sync::Arc;
use thiserror::Error;

use super::aggregate::{build_daily_summaries, build_hourly_summaries};
use super::models::{DailySummary, ForecastResponse};
use crate::error::HttpError;
use crate::extractors::Location;
use crate::impl_into_response;
use crate::openweather::models::ForecastSamples;
use crate::openweather::{OpenWeatherClient, OpenWeatherError};
use crate::units::TemperatureUnit;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error(transparent)]
    Upstream(#[from] OpenWeatherError),

    #[error("Invalid UTC offset in forecast payload: {0}s")]
    InvalidTimezoneOffset(i32),
}

impl HttpError for ForecastError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Upstream(e) => e.status_code(),
            Self::InvalidTimezoneOffset(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Upstream(e) => e.error_code(),
            Self::InvalidTimezoneOffset(_) => Some("INVALID_RESPONSE"),
        }
    }
}

impl_into_response!(ForecastError);

/// Daily and next-24h forecast plus air quality for one location
pub struct ForecastService {
    client: Arc<OpenWeatherClient>,
    grouping_zone: Option<chrono_tz::Tz>,
}

impl ForecastService {
    /// `grouping_zone` fixes the calendar used for daily rollups; `None`
    /// groups by each location's own UTC offset.
    pub fn new(client: Arc<OpenWeatherClient>, grouping_zone: Option<chrono_tz::Tz>) -> Self {
        Self {
            client,
            grouping_zone,
        }
    }

    pub async fn get_forecast(
        &self,
        location: &Location,
        units: TemperatureUnit,
    ) -> Result<ForecastResponse, ForecastError> {
        let (lat, lon) = match location {
            Location::City(city) => {
                let place = self.client.geocode(city).await?;
                tracing::debug!(city = %place.name, lat = %place.lat, lon = %place.lon, "Geocoded city");
                (place.lat, place.lon)
            }
            Location::Coords { lat, lon } => (*lat, *lon),
        };

        let (forecast, air_quality) = tokio::try_join!(
            self.client.forecast(lat, lon),
            self.client.air_pollution(lat, lon)
        )?;

        let (daily, grouping_timezone) = self.aggregate_daily(&forecast)?;
        let hourly = build_hourly_summaries(&forecast.samples);

        tracing::info!(
            lat = %lat,
            lon = %lon,
            samples = forecast.samples.len(),
            days = daily.len(),
            aqi = air_quality.aqi,
            "Forecast aggregated"
        );

        Ok(ForecastResponse {
            lat,
            lon,
            units,
            grouping_timezone,
            daily: daily.into_iter().map(|d| d.in_unit(units)).collect(),
            hourly: hourly.into_iter().map(|h| h.in_unit(units)).collect(),
            air_quality,
        })
    }

    /// Daily rollups and the name of the zone whose dates were used
    fn aggregate_daily(
        &self,
        forecast: &ForecastSamples,
    ) -> Result<(Vec<DailySummary>, String), ForecastError> {
        match self.grouping_zone {
            Some(tz) => Ok((build_daily_summaries(&forecast.samples, &tz), tz.name().to_string())),
            None => {
                let offset = FixedOffset::east_opt(forecast.timezone_offset_secs).ok_or(
                    ForecastError::InvalidTimezoneOffset(forecast.timezone_offset_secs),
                )?;
                Ok((
                    build_daily_summaries(&forecast.samples, &offset),
                    format!("UTC{}", offset),
                ))
            }
        }
    }
}
