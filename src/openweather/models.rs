use serde::Deserialize;

use crate::classify::{classify_air_quality_index, classify_wind_direction};
use crate::forecast::models::{AirQualityReport, PollutantComponents, Sample};
use crate::search::models::CityMatch;
use crate::units::{fraction_to_percent, meters_to_km, mps_to_kph, round_half_up, TemperatureUnit};
use crate::weather::models::CurrentConditions;

use super::OpenWeatherError;

// ============================================================================
// Raw OpenWeatherMap payloads (Internal)
// These structs deserialize the raw API response; not all fields are used
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherCondition {
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// `main` block shared by current weather and forecast entries
#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: u32,
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
}

/// GET /data/2.5/weather
#[derive(Debug, Deserialize)]
pub struct CurrentWeatherPayload {
    pub name: String,
    pub coord: Coordinates,
    pub sys: CurrentSys,
    pub main: MainReadings,
    pub weather: Vec<WeatherCondition>,
    pub wind: Wind,
    #[serde(default)]
    pub visibility: Option<f64>,
    pub dt: i64,
    #[serde(default)]
    pub timezone: i32,
}

#[derive(Debug, Deserialize)]
pub struct CurrentSys {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

/// GET /data/2.5/forecast (5 days at 3-hour steps)
#[derive(Debug, Deserialize)]
pub struct ForecastPayload {
    pub list: Vec<ForecastEntry>,
    pub city: ForecastCity,
}

#[derive(Debug, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: MainReadings,
    pub weather: Vec<WeatherCondition>,
    pub wind: Wind,
    #[serde(default)]
    pub pop: f64,
}

#[derive(Debug, Deserialize)]
pub struct ForecastCity {
    /// Shift in seconds from UTC
    #[serde(default)]
    pub timezone: i32,
}

/// GET /data/2.5/air_pollution
#[derive(Debug, Deserialize)]
pub struct AirPollutionPayload {
    pub list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
pub struct AirPollutionEntry {
    pub main: AirPollutionIndex,
    pub components: PollutantComponents,
}

#[derive(Debug, Deserialize)]
pub struct AirPollutionIndex {
    pub aqi: i64,
}

/// GET /geo/1.0/direct
#[derive(Debug, Deserialize)]
pub struct GeoLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: String,
    pub state: Option<String>,
}

/// Error body returned by OpenWeatherMap on non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

// ============================================================================
// Mapping into domain types
// ============================================================================

/// Raw forecast mapped into aggregator input
#[derive(Debug)]
pub struct ForecastSamples {
    pub timezone_offset_secs: i32,
    pub samples: Vec<Sample>,
}

fn first_condition(
    conditions: Vec<WeatherCondition>,
    context: &str,
) -> Result<WeatherCondition, OpenWeatherError> {
    conditions.into_iter().next().ok_or_else(|| {
        OpenWeatherError::InvalidResponse(format!("{} has no weather condition", context))
    })
}

impl TryFrom<ForecastEntry> for Sample {
    type Error = OpenWeatherError;

    fn try_from(entry: ForecastEntry) -> Result<Self, Self::Error> {
        let condition = first_condition(entry.weather, "forecast entry")?;

        Ok(Sample {
            timestamp: entry.dt,
            temperature: round_half_up(entry.main.temp),
            feels_like: round_half_up(entry.main.feels_like),
            temperature_min: round_half_up(entry.main.temp_min),
            temperature_max: round_half_up(entry.main.temp_max),
            humidity: entry.main.humidity,
            wind_speed_kph: mps_to_kph(entry.wind.speed),
            precipitation_probability: fraction_to_percent(entry.pop),
            condition_main: condition.main,
            condition_description: condition.description,
            icon_id: condition.icon,
        })
    }
}

impl TryFrom<ForecastPayload> for ForecastSamples {
    type Error = OpenWeatherError;

    fn try_from(payload: ForecastPayload) -> Result<Self, Self::Error> {
        let samples = payload
            .list
            .into_iter()
            .map(Sample::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ForecastSamples {
            timezone_offset_secs: payload.city.timezone,
            samples,
        })
    }
}

impl TryFrom<CurrentWeatherPayload> for CurrentConditions {
    type Error = OpenWeatherError;

    fn try_from(d: CurrentWeatherPayload) -> Result<Self, Self::Error> {
        let condition = first_condition(d.weather, "current weather")?;

        Ok(CurrentConditions {
            city: d.name,
            country: d.sys.country,
            lat: d.coord.lat,
            lon: d.coord.lon,
            units: TemperatureUnit::Celsius,
            temperature: round_half_up(d.main.temp),
            feels_like: round_half_up(d.main.feels_like),
            humidity: d.main.humidity,
            pressure: d.main.pressure,
            visibility_km: d.visibility.map(meters_to_km),
            wind_speed_kph: mps_to_kph(d.wind.speed),
            wind_degrees: d.wind.deg,
            wind_direction: classify_wind_direction(d.wind.deg).to_string(),
            condition_main: condition.main,
            description: condition.description,
            icon: condition.icon,
            sunrise: d.sys.sunrise,
            sunset: d.sys.sunset,
            timezone_offset_secs: d.timezone,
            timestamp: d.dt,
        })
    }
}

impl TryFrom<AirPollutionPayload> for AirQualityReport {
    type Error = OpenWeatherError;

    fn try_from(payload: AirPollutionPayload) -> Result<Self, Self::Error> {
        let entry = payload.list.into_iter().next().ok_or_else(|| {
            OpenWeatherError::InvalidResponse("air pollution list is empty".to_string())
        })?;

        Ok(AirQualityReport {
            aqi: entry.main.aqi,
            classification: classify_air_quality_index(entry.main.aqi),
            components: entry.components,
        })
    }
}

impl From<GeoLocation> for CityMatch {
    fn from(g: GeoLocation) -> Self {
        CityMatch {
            name: g.name,
            country: g.country,
            state: g.state,
            lat: g.lat,
            lon: g.lon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn forecast_entry(weather: serde_json::Value) -> ForecastEntry {
        serde_json::from_value(json!({
            "dt": 1700000000,
            "main": {
                "temp": 12.6, "feels_like": 11.4, "temp_min": 11.5, "temp_max": 13.2,
                "pressure": 1012, "humidity": 81
            },
            "weather": weather,
            "wind": { "speed": 4.12, "deg": 230 },
            "visibility": 10000,
            "pop": 0.27,
            "dt_txt": "2023-11-14 22:13:20"
        }))
        .unwrap()
    }

    #[test]
    fn test_forecast_entry_to_sample() {
        let entry = forecast_entry(json!([
            { "id": 500, "main": "Rain", "description": "light rain", "icon": "10n" }
        ]));

        let sample = Sample::try_from(entry).unwrap();

        assert_eq!(sample.timestamp, 1700000000);
        assert_eq!(sample.temperature, 13);
        assert_eq!(sample.feels_like, 11);
        assert_eq!(sample.temperature_min, 12);
        assert_eq!(sample.temperature_max, 13);
        assert_eq!(sample.humidity, 81);
        assert_eq!(sample.wind_speed_kph, 15);
        assert_eq!(sample.precipitation_probability, 27);
        assert_eq!(sample.condition_main, "Rain");
        assert_eq!(sample.icon_id, "10n");
    }

    #[test]
    fn test_forecast_entry_without_condition_is_invalid() {
        let entry = forecast_entry(json!([]));
        let err = Sample::try_from(entry).unwrap_err();
        assert!(matches!(err, OpenWeatherError::InvalidResponse(_)));
    }

    #[test]
    fn test_current_weather_conversions() {
        let payload: CurrentWeatherPayload = serde_json::from_value(json!({
            "coord": { "lon": -0.1257, "lat": 51.5085 },
            "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }],
            "main": {
                "temp": 8.49, "feels_like": 5.6, "temp_min": 7.0, "temp_max": 9.8,
                "pressure": 1019, "humidity": 75
            },
            "visibility": 6500,
            "wind": { "speed": 5.0, "deg": 92 },
            "dt": 1700000000,
            "sys": { "country": "GB", "sunrise": 1699946000, "sunset": 1699979000 },
            "timezone": 0,
            "name": "London"
        }))
        .unwrap();

        let current = CurrentConditions::try_from(payload).unwrap();

        assert_eq!(current.city, "London");
        assert_eq!(current.country, "GB");
        assert_eq!(current.temperature, 8);
        assert_eq!(current.feels_like, 6);
        assert_eq!(current.visibility_km, Some(7));
        assert_eq!(current.wind_speed_kph, 18);
        assert_eq!(current.wind_direction, "E");
        assert_eq!(current.units, TemperatureUnit::Celsius);
    }

    #[test]
    fn test_air_pollution_mapping() {
        let payload: AirPollutionPayload = serde_json::from_value(json!({
            "coord": { "lon": 50.0, "lat": 50.0 },
            "list": [{
                "main": { "aqi": 4 },
                "components": {
                    "co": 201.94, "no": 0.02, "no2": 0.77, "o3": 68.66,
                    "so2": 0.64, "pm2_5": 0.5, "pm10": 0.54, "nh3": 0.12
                },
                "dt": 1700000000
            }]
        }))
        .unwrap();

        let report = AirQualityReport::try_from(payload).unwrap();

        assert_eq!(report.aqi, 4);
        assert_eq!(report.classification.label, "Poor");
        assert_eq!(report.components.o3, 68.66);
    }

    #[test]
    fn test_empty_air_pollution_is_invalid() {
        let payload = AirPollutionPayload { list: vec![] };
        assert!(matches!(
            AirQualityReport::try_from(payload),
            Err(OpenWeatherError::InvalidResponse(_))
        ));
    }
}
