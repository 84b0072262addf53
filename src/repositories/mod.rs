// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers over one collection each
// - NO business logic, NO retries
// - NO event emission
// - NO cross-repository calls
// - Queries are spelled out explicitly per method

pub mod favorites_repository;
pub mod saved_movie_repository;
pub mod search_count_repository;
pub mod user_image_repository;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::error::AppResult;
use crate::integrations::Document;

pub use favorites_repository::{FavoritesRepository, RemoteFavoritesRepository};
pub use saved_movie_repository::{RemoteSavedMovieRepository, SavedMovieRepository};
pub use search_count_repository::{RemoteSearchCountRepository, SearchCountRepository};
pub use user_image_repository::{RemoteUserImageRepository, UserImageRepository};

/// An entity together with the store's identity for it
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    pub document_id: String,
    pub created_at: DateTime<Utc>,
    pub entity: T,
}

impl<T: DeserializeOwned> Record<T> {
    pub fn from_document(document: &Document) -> AppResult<Self> {
        Ok(Self {
            document_id: document.id.clone(),
            created_at: document.created_at,
            entity: document.decode()?,
        })
    }
}
