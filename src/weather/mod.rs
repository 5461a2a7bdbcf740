pub mod handlers;
pub mod models;
mod service;

pub use models::CurrentConditions;
pub use service::WeatherService;
