use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Display unit for temperatures.
///
/// Upstream data is always fetched in metric; Fahrenheit is derived from the
/// already-rounded Celsius value with [`convert_temperature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Short suffix used in responses ("C" / "F")
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Celsius => write!(f, "metric"),
            Self::Fahrenheit => write!(f, "imperial"),
        }
    }
}

/// Accepts the OpenWeatherMap unit names as well as the plain unit names.
impl FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" | "celsius" | "c" => Ok(Self::Celsius),
            "imperial" | "fahrenheit" | "f" => Ok(Self::Fahrenheit),
            other => Err(format!(
                "Unsupported units '{}'. Use metric or imperial",
                other
            )),
        }
    }
}

/// Round half up (towards positive infinity), the way the dashboard rounds
/// every displayed number. `f64::round` would send -2.5 to -3 instead of -2.
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Convert an integer Celsius reading into the requested display unit.
///
/// The input has already been rounded upstream, so converting there and back
/// is lossy (e.g. 21 °C -> 70 °F -> 21.1 °C). Callers must always convert
/// from the Celsius value, never from a previously converted one.
pub fn convert_temperature(celsius: i32, unit: TemperatureUnit) -> i32 {
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => round_half_up(celsius as f64 * 9.0 / 5.0 + 32.0),
    }
}

/// Metres per second to whole kilometres per hour
pub fn mps_to_kph(speed: f64) -> i32 {
    round_half_up(speed * 3.6)
}

/// Metres to whole kilometres
pub fn meters_to_km(meters: f64) -> i32 {
    round_half_up(meters / 1000.0)
}

/// A 0.0-1.0 probability to a 0-100 integer percentage
pub fn fraction_to_percent(fraction: f64) -> u8 {
    round_half_up(fraction * 100.0).clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freezing_and_boiling_points() {
        assert_eq!(convert_temperature(0, TemperatureUnit::Fahrenheit), 32);
        assert_eq!(convert_temperature(100, TemperatureUnit::Fahrenheit), 212);
    }

    #[test]
    fn test_celsius_is_identity() {
        assert_eq!(convert_temperature(-7, TemperatureUnit::Celsius), -7);
        assert_eq!(convert_temperature(23, TemperatureUnit::Celsius), 23);
    }

    #[test]
    fn test_fahrenheit_rounds() {
        // 21 * 1.8 + 32 = 69.8
        assert_eq!(convert_temperature(21, TemperatureUnit::Fahrenheit), 70);
        // -40 is the same in both scales
        assert_eq!(convert_temperature(-40, TemperatureUnit::Fahrenheit), -40);
    }

    #[test]
    fn test_round_half_up_on_negatives() {
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.6), -3);
    }

    #[test]
    fn test_wind_and_visibility_conversions() {
        assert_eq!(mps_to_kph(5.0), 18);
        assert_eq!(mps_to_kph(4.12), 15);
        assert_eq!(meters_to_km(10000.0), 10);
        assert_eq!(meters_to_km(6500.0), 7);
    }

    #[test]
    fn test_fraction_to_percent() {
        assert_eq!(fraction_to_percent(0.0), 0);
        assert_eq!(fraction_to_percent(0.35), 35);
        assert_eq!(fraction_to_percent(1.0), 100);
    }

    #[test]
    fn test_parse_units() {
        assert_eq!("metric".parse::<TemperatureUnit>(), Ok(TemperatureUnit::Celsius));
        assert_eq!("Imperial".parse::<TemperatureUnit>(), Ok(TemperatureUnit::Fahrenheit));
        assert_eq!("f".parse::<TemperatureUnit>(), Ok(TemperatureUnit::Fahrenheit));
        assert!("kelvin".parse::<TemperatureUnit>().is_err());
    }
}
