use axum::{
    extract::{FromRequestParts, Path, Query},
    http::{request::Parts, StatusCode},
};
use serde::Deserialize;
use thiserror::Error;

use crate::error::HttpError;
use crate::impl_into_response;
use crate::units::TemperatureUnit;
use crate::AppState;

/// Where a weather or forecast request is aimed
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    City(String),
    Coords { lat: f64, lon: f64 },
}

/// Raw query string for location-based endpoints. Coordinates stay strings
/// so malformed numbers get our own rejection body.
#[derive(Debug, Default, Deserialize)]
pub struct LocationParams {
    pub city: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub units: Option<String>,
}

/// Location and display units resolved from path, query and config
///
/// Resolution order: coordinates in the query, then a `{city}` path
/// segment, then `?city=`, then the configured default city.
#[derive(Debug, PartialEq)]
pub struct LocationQuery {
    pub location: Location,
    pub units: TemperatureUnit,
}

#[derive(Error, Debug, PartialEq)]
pub enum LocationRejection {
    #[error("Provide a city or both lat and lon")]
    MissingLocation,

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid units '{0}', expected metric or imperial")]
    InvalidUnits(String),

    #[error("Malformed query string: {0}")]
    InvalidQuery(String),
}

impl HttpError for LocationRejection {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::MissingLocation => Some("MISSING_LOCATION"),
            Self::InvalidCoordinates(_) => Some("INVALID_COORDINATES"),
            Self::InvalidUnits(_) => Some("INVALID_UNITS"),
            Self::InvalidQuery(_) => Some("INVALID_QUERY"),
        }
    }
}

impl_into_response!(LocationRejection);

impl FromRequestParts<AppState> for LocationQuery {
    type Rejection = LocationRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let path_city = Path::<String>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|Path(city)| city);

        let Query(params) = Query::<LocationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| LocationRejection::InvalidQuery(e.body_text()))?;

        let default_units = state
            .config
            .default_units()
            .map_err(|_| LocationRejection::InvalidUnits(state.config.units.clone()))?;

        resolve(
            path_city,
            params,
            state.config.default_city.as_deref(),
            default_units,
        )
    }
}

pub fn resolve(
    path_city: Option<String>,
    params: LocationParams,
    default_city: Option<&str>,
    default_units: TemperatureUnit,
) -> Result<LocationQuery, LocationRejection> {
    let units = match params.units.as_deref().map(str::trim) {
        None | Some("") => default_units,
        Some(raw) => raw
            .parse()
            .map_err(|_| LocationRejection::InvalidUnits(raw.to_string()))?,
    };

    let location = match (non_blank(params.lat), non_blank(params.lon)) {
        (Some(lat), Some(lon)) => {
            let lat = parse_coordinate("lat", &lat)?;
            let lon = parse_coordinate("lon", &lon)?;
            validate_coordinates(lat, lon).map_err(LocationRejection::InvalidCoordinates)?;
            Location::Coords { lat, lon }
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(LocationRejection::InvalidCoordinates(
                "lat and lon must be given together".to_string(),
            ))
        }
        (None, None) => non_blank(path_city)
            .or_else(|| non_blank(params.city))
            .or_else(|| non_blank(default_city.map(str::to_string)))
            .map(Location::City)
            .ok_or(LocationRejection::MissingLocation)?,
    };

    Ok(LocationQuery { location, units })
}

/// Latitude within ±90, longitude within ±180, both finite
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), String> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(format!("lat {} is outside -90..=90", lat));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(format!("lon {} is outside -180..=180", lon));
    }
    Ok(())
}

fn parse_coordinate(name: &str, raw: &str) -> Result<f64, LocationRejection> {
    raw.parse::<f64>()
        .map_err(|_| LocationRejection::InvalidCoordinates(format!("{} '{}' is not a number", name, raw)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(city: Option<&str>, lat: Option<&str>, lon: Option<&str>) -> LocationParams {
        LocationParams {
            city: city.map(str::to_string),
            lat: lat.map(str::to_string),
            lon: lon.map(str::to_string),
            units: None,
        }
    }

    fn resolve_default(params: LocationParams) -> Result<LocationQuery, LocationRejection> {
        resolve(None, params, None, TemperatureUnit::Celsius)
    }

    #[test]
    fn test_query_city() {
        let query = resolve_default(params(Some(" Paris "), None, None)).unwrap();
        assert_eq!(query.location, Location::City("Paris".to_string()));
        assert_eq!(query.units, TemperatureUnit::Celsius);
    }

    #[test]
    fn test_coordinates_win_over_city() {
        let query = resolve_default(params(Some("Paris"), Some("41.88"), Some("-87.63"))).unwrap();
        assert_eq!(
            query.location,
            Location::Coords {
                lat: 41.88,
                lon: -87.63
            }
        );
    }

    #[test]
    fn test_path_city_wins_over_query_city() {
        let query = resolve(
            Some("Berlin".to_string()),
            params(Some("Paris"), None, None),
            None,
            TemperatureUnit::Celsius,
        )
        .unwrap();
        assert_eq!(query.location, Location::City("Berlin".to_string()));
    }

    #[test]
    fn test_missing_location() {
        assert_eq!(
            resolve_default(params(None, None, None)),
            Err(LocationRejection::MissingLocation)
        );
        assert_eq!(
            resolve_default(params(Some("  "), Some(""), None)),
            Err(LocationRejection::MissingLocation)
        );
    }

    #[test]
    fn test_default_city_fills_in() {
        let query = resolve(
            None,
            params(None, None, None),
            Some("Chicago"),
            TemperatureUnit::Fahrenheit,
        )
        .unwrap();
        assert_eq!(query.location, Location::City("Chicago".to_string()));
        assert_eq!(query.units, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn test_invalid_coordinates() {
        for (lat, lon) in [
            (Some("abc"), Some("1")),
            (Some("91"), Some("0")),
            (Some("0"), Some("-180.5")),
            (Some("NaN"), Some("0")),
            (Some("10"), None),
        ] {
            let err = resolve_default(params(None, lat, lon)).unwrap_err();
            assert!(
                matches!(err, LocationRejection::InvalidCoordinates(_)),
                "{:?}/{:?} gave {:?}",
                lat,
                lon,
                err
            );
            assert_eq!(err.error_code(), Some("INVALID_COORDINATES"));
        }
    }

    #[test]
    fn test_units_param() {
        let mut p = params(Some("Paris"), None, None);
        p.units = Some("imperial".to_string());
        assert_eq!(resolve_default(p).unwrap().units, TemperatureUnit::Fahrenheit);

        let mut p = params(Some("Paris"), None, None);
        p.units = Some("kelvin".to_string());
        assert_eq!(
            resolve_default(p),
            Err(LocationRejection::InvalidUnits("kelvin".to_string()))
        );
    }

    #[test]
    fn test_validate_coordinates_bounds() {
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
        assert!(validate_coordinates(90.01, 0.0).is_err());
        assert!(validate_coordinates(0.0, f64::INFINITY).is_err());
    }
}
