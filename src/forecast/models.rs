use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::classify::AirQualityClass;
use crate::units::{convert_temperature, TemperatureUnit};

// ============================================================================
// Aggregator input
// ============================================================================

/// One 3-hour forecast point, already converted to display units
/// (whole degrees Celsius, km/h, percent).
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: i64,
    pub temperature: i32,
    pub feels_like: i32,
    pub temperature_min: i32,
    pub temperature_max: i32,
    pub humidity: u8,
    pub wind_speed_kph: i32,
    /// 0-100
    pub precipitation_probability: u8,
    pub condition_main: String,
    pub condition_description: String,
    pub icon_id: String,
}

// ============================================================================
// API Response Models (External - what we return to clients)
// ============================================================================

/// One calendar day of the forecast.
///
/// Only the temperatures are reduced over the day; every other field is taken
/// from the day's middle sample.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailySummary {
    pub timestamp: i64,
    pub temperature: i32,
    pub temperature_min: i32,
    pub temperature_max: i32,
    pub feels_like: i32,
    pub humidity: u8,
    pub wind_speed_kph: i32,
    pub precipitation_probability: u8,
    pub condition_main: String,
    pub condition_description: String,
    pub icon_id: String,
}

/// One forecast point within the next 24 hours
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HourlySummary {
    pub timestamp: i64,
    pub temperature: i32,
    pub feels_like: i32,
    pub humidity: u8,
    pub wind_speed_kph: i32,
    pub precipitation_probability: u8,
    pub condition_main: String,
    pub condition_description: String,
    pub icon_id: String,
}

impl DailySummary {
    /// Re-express the Celsius temperatures in `unit`
    pub fn in_unit(mut self, unit: TemperatureUnit) -> Self {
        self.temperature = convert_temperature(self.temperature, unit);
        self.temperature_min = convert_temperature(self.temperature_min, unit);
        self.temperature_max = convert_temperature(self.temperature_max, unit);
        self.feels_like = convert_temperature(self.feels_like, unit);
        self
    }
}

impl HourlySummary {
    /// Re-express the Celsius temperatures in `unit`
    pub fn in_unit(mut self, unit: TemperatureUnit) -> Self {
        self.temperature = convert_temperature(self.temperature, unit);
        self.feels_like = convert_temperature(self.feels_like, unit);
        self
    }
}

/// Pollutant concentrations in μg/m³
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PollutantComponents {
    pub co: f64,
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub nh3: f64,
}

/// Current air quality at a location
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AirQualityReport {
    pub aqi: i64,
    pub classification: AirQualityClass,
    pub components: PollutantComponents,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ForecastResponse {
    pub lat: f64,
    pub lon: f64,
    pub units: TemperatureUnit,
    /// Zone whose calendar days key `daily`: an IANA name, or `UTC±hh:mm`
    pub grouping_timezone: String,
    pub daily: Vec<DailySummary>,
    pub hourly: Vec<HourlySummary>,
    pub air_quality: AirQualityReport,
}
