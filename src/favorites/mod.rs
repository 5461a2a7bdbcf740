pub mod handlers;
pub mod models;
mod service;

pub use models::{Favorite, NewFavorite};
pub use service::FavoritesService;
