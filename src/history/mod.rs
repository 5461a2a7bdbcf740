pub mod handlers;
pub mod models;
mod service;

pub use models::{NewSearchEntry, SearchEntry};
pub use service::HistoryService;
