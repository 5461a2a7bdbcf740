use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::openweather::client::{DEFAULT_API_BASE_URL, DEFAULT_GEO_BASE_URL};
use crate::units::TemperatureUnit;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// OpenWeatherMap API key
    pub openweathermap_api_key: String,

    /// City used when a request names no location; requests without one are
    /// rejected when unset
    #[serde(default)]
    pub default_city: Option<String>,

    /// Display units when the request has none: metric or imperial
    #[serde(default = "default_units")]
    pub units: String,

    /// Database URL (SQLite connection string)
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Lifetime of a cached current-conditions snapshot
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// IANA zone (e.g. "Europe/Berlin") whose calendar days key the daily
    /// forecast. Unset: each location's own UTC offset.
    #[serde(default)]
    pub grouping_timezone: Option<String>,

    /// Searches returned by the history endpoint
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    /// Upstream request timeout
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// OpenWeatherMap data API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// OpenWeatherMap geocoding API base URL
    #[serde(default = "default_geo_base_url")]
    pub geo_base_url: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_database_url() -> String {
    "sqlite:data/skycast.db".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    10 * 60
}

fn default_history_limit() -> u32 {
    20
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_geo_base_url() -> String {
    DEFAULT_GEO_BASE_URL.to_string()
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("units", default_units())?
            // Load from config file if present
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // Override with environment variables (prefixed with SKYCAST_)
            // Convert SCREAMING_SNAKE_CASE env vars to snake_case config keys
            .add_source(
                Environment::with_prefix("SKYCAST")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        let app: AppConfig = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// Reject values that would otherwise only fail on the first request
    fn validate(&self) -> Result<(), ConfigError> {
        if self.openweathermap_api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "openweathermap_api_key must not be empty".to_string(),
            ));
        }
        self.default_units()?;
        self.grouping_zone()?;
        Ok(())
    }

    pub fn default_units(&self) -> Result<TemperatureUnit, ConfigError> {
        self.units.parse().map_err(ConfigError::Message)
    }

    pub fn grouping_zone(&self) -> Result<Option<chrono_tz::Tz>, ConfigError> {
        self.grouping_timezone
            .as_deref()
            .map(|name| {
                name.parse::<chrono_tz::Tz>().map_err(|_| {
                    ConfigError::Message(format!("Unknown grouping_timezone '{}'", name))
                })
            })
            .transpose()
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
