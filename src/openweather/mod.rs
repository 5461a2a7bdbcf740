pub mod client;
pub mod models;

pub use client::OpenWeatherClient;

use axum::http::StatusCode;
use thiserror::Error;

use crate::error::HttpError;
use crate::impl_into_response;

#[derive(Error, Debug)]
pub enum OpenWeatherError {
    #[error("Failed to fetch data: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("OpenWeatherMap rejected the API key")]
    Unauthorized,

    #[error("API error: {0}")]
    ApiError(String),

    #[error("OpenWeatherMap unavailable ({status}): {message}")]
    Unavailable { status: u16, message: String },

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl HttpError for OpenWeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CityNotFound(_) => StatusCode::NOT_FOUND,
            Self::RequestError(_) => StatusCode::BAD_GATEWAY,
            Self::Unauthorized => StatusCode::BAD_GATEWAY,
            Self::ApiError(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable { .. } => StatusCode::BAD_GATEWAY,
            Self::InvalidResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::CityNotFound(_) => Some("CITY_NOT_FOUND"),
            Self::RequestError(_) => Some("REQUEST_ERROR"),
            Self::Unauthorized => Some("UPSTREAM_UNAUTHORIZED"),
            Self::ApiError(_) => Some("API_ERROR"),
            Self::Unavailable { .. } => Some("UPSTREAM_UNAVAILABLE"),
            Self::InvalidResponse(_) => Some("INVALID_RESPONSE"),
        }
    }
}

impl_into_response!(OpenWeatherError);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_outage_is_bad_gateway() {
        let err = OpenWeatherError::Unavailable {
            status: 503,
            message: "HTTP 503".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_code(), Some("UPSTREAM_UNAVAILABLE"));

        let err = OpenWeatherError::ApiError("wrong latitude".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
