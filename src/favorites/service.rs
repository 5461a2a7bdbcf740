use axum::http::StatusCode;
use std::sync::Arc;
use thiserror::Error;

use super::models::{Favorite, NewFavorite};
use crate::clock::Clock;
use crate::db::{DbError, FavoriteRepository};
use crate::error::HttpError;
use crate::extractors::validate_coordinates;
use crate::impl_into_response;

#[derive(Error, Debug)]
pub enum FavoritesError {
    #[error("Invalid favorite: {0}")]
    Validation(String),

    #[error("Favorite {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl HttpError for FavoritesError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Validation(_) => Some("VALIDATION_ERROR"),
            Self::NotFound(_) => Some("FAVORITE_NOT_FOUND"),
            Self::Database(_) => Some("DATABASE_ERROR"),
        }
    }
}

impl_into_response!(FavoritesError);

pub struct FavoritesService {
    repo: Arc<dyn FavoriteRepository>,
    clock: Arc<dyn Clock>,
}

impl FavoritesService {
    pub fn new(repo: Arc<dyn FavoriteRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub async fn list(&self) -> Result<Vec<Favorite>, FavoritesError> {
        Ok(self.repo.list().await?)
    }

    /// Save a city. Saving the same (city, country) again refreshes its
    /// coordinates and keeps the original id and timestamp.
    pub async fn save(&self, favorite: NewFavorite) -> Result<Favorite, FavoritesError> {
        let favorite = normalize(favorite)?;
        let saved = self
            .repo
            .upsert(&favorite, self.clock.now_timestamp())
            .await?;

        tracing::info!(id = saved.id, city = %saved.city, country = %saved.country, "Favorite saved");
        Ok(saved)
    }

    pub async fn remove(&self, id: i64) -> Result<(), FavoritesError> {
        if !self.repo.remove(id).await? {
            return Err(FavoritesError::NotFound(id));
        }

        tracing::info!(id = id, "Favorite removed");
        Ok(())
    }
}

fn normalize(mut favorite: NewFavorite) -> Result<NewFavorite, FavoritesError> {
    favorite.city = favorite.city.trim().to_string();
    if favorite.city.is_empty() {
        return Err(FavoritesError::Validation("city must not be empty".to_string()));
    }
    validate_coordinates(favorite.lat, favorite.lon).map_err(FavoritesError::Validation)?;
    favorite.country = favorite
        .country
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    Ok(favorite)
}
