use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::units::{convert_temperature, TemperatureUnit};

/// Current conditions at a location.
///
/// This is also the snapshot stored in the current-conditions cache, always
/// in Celsius; conversion happens on the way out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurrentConditions {
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub units: TemperatureUnit,
    pub temperature: i32,
    pub feels_like: i32,
    pub humidity: u8,
    /// hPa
    pub pressure: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility_km: Option<i32>,
    pub wind_speed_kph: i32,
    pub wind_degrees: f64,
    /// 16-point compass label, e.g. "SSW"
    pub wind_direction: String,
    pub condition_main: String,
    pub description: String,
    pub icon: String,
    pub sunrise: i64,
    pub sunset: i64,
    pub timezone_offset_secs: i32,
    /// Observation time (unix seconds)
    pub timestamp: i64,
}

impl CurrentConditions {
    /// Convert a Celsius snapshot into `unit`
    pub fn in_unit(mut self, unit: TemperatureUnit) -> Self {
        if self.units == unit {
            return self;
        }
        self.temperature = convert_temperature(self.temperature, unit);
        self.feels_like = convert_temperature(self.feels_like, unit);
        self.units = unit;
        self
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_unit_fahrenheit() {
        let current = fixtures::london().in_unit(TemperatureUnit::Fahrenheit);
        assert_eq!(current.units, TemperatureUnit::Fahrenheit);
        assert_eq!(current.temperature, 50);
        // 8 * 1.8 + 32 = 46.4
        assert_eq!(current.feels_like, 46);
    }

    #[test]
    fn test_in_unit_same_unit_is_noop() {
        let current = fixtures::london();
        assert_eq!(current.clone().in_unit(TemperatureUnit::Celsius), current);
    }
}
