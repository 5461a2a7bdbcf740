use serde::Serialize;
use utoipa::ToSchema;

use crate::units::round_half_up;

/// 16-point compass rose, clockwise from north
const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

const DEGREES_PER_POINT: f64 = 360.0 / 16.0;

/// OpenWeatherMap air quality index levels (1-5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum AirQualityLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    Unknown,
}

/// Display classification of an AQI value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AirQualityClass {
    pub level: AirQualityLevel,
    pub label: &'static str,
    /// 1 (best) to 5 (worst); 0 when the index is not recognized
    pub severity_rank: u8,
    /// Hex color used by the dashboard gauge
    pub color: &'static str,
}

/// Classify an OpenWeatherMap AQI value.
///
/// Any value outside 1-5 maps to `Unknown` with rank 0 instead of failing:
/// the classification is cosmetic and an unexpected upstream value must not
/// break the response.
pub fn classify_air_quality_index(aqi: i64) -> AirQualityClass {
    let (level, label, severity_rank, color) = match aqi {
        1 => (AirQualityLevel::Good, "Good", 1, "#00e400"),
        2 => (AirQualityLevel::Fair, "Fair", 2, "#ffff00"),
        3 => (AirQualityLevel::Moderate, "Moderate", 3, "#ff7e00"),
        4 => (AirQualityLevel::Poor, "Poor", 4, "#ff0000"),
        5 => (AirQualityLevel::VeryPoor, "Very Poor", 5, "#8f3f97"),
        _ => (AirQualityLevel::Unknown, "Unknown", 0, "#888888"),
    };

    AirQualityClass {
        level,
        label,
        severity_rank,
        color,
    }
}

/// Compass label for a wind bearing in degrees.
///
/// Each point covers 22.5° centred on its direction, so "N" spans
/// [348.75°, 11.25°). Values outside 0-360 wrap around.
pub fn classify_wind_direction(degrees: f64) -> &'static str {
    let bucket = round_half_up(degrees / DEGREES_PER_POINT).rem_euclid(16) as usize;
    COMPASS_POINTS[bucket]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_directions() {
        assert_eq!(classify_wind_direction(0.0), "N");
        assert_eq!(classify_wind_direction(90.0), "E");
        assert_eq!(classify_wind_direction(180.0), "S");
        assert_eq!(classify_wind_direction(270.0), "W");
    }

    #[test]
    fn test_wind_direction_wraps_to_north() {
        assert_eq!(classify_wind_direction(359.0), "N");
        assert_eq!(classify_wind_direction(360.0), "N");
        assert_eq!(classify_wind_direction(348.75), "N");
    }

    #[test]
    fn test_wind_direction_bucket_edges() {
        assert_eq!(classify_wind_direction(11.24), "N");
        assert_eq!(classify_wind_direction(11.25), "NNE");
        assert_eq!(classify_wind_direction(22.5), "NNE");
        assert_eq!(classify_wind_direction(348.7), "NNW");
    }

    #[test]
    fn test_wind_direction_negative_bearing() {
        assert_eq!(classify_wind_direction(-90.0), "W");
    }

    #[test]
    fn test_known_aqi_levels() {
        assert_eq!(classify_air_quality_index(1).label, "Good");
        assert_eq!(classify_air_quality_index(2).label, "Fair");

        let moderate = classify_air_quality_index(3);
        assert_eq!(moderate.label, "Moderate");
        assert_eq!(moderate.level, AirQualityLevel::Moderate);
        assert_eq!(moderate.severity_rank, 3);

        assert_eq!(classify_air_quality_index(4).label, "Poor");
        assert_eq!(classify_air_quality_index(5).level, AirQualityLevel::VeryPoor);
    }

    #[test]
    fn test_unknown_aqi() {
        for aqi in [0, 6, 9, -1] {
            let class = classify_air_quality_index(aqi);
            assert_eq!(class.label, "Unknown");
            assert_eq!(class.level, AirQualityLevel::Unknown);
            assert_eq!(class.severity_rank, 0);
        }
    }
}
