// src/services/saved_movie_service.rs
use std::sync::Arc;

use log::{error, info};

use crate::domain::keys::saved_movie_document_id;
use crate::domain::{validate_saved_movie, validate_user_id, MovieDetails, SavedMovie};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, MovieSaved, SavedMovieRemoved};
use crate::repositories::SavedMovieRepository;

pub struct SavedMovieService {
    saved_repo: Arc<dyn SavedMovieRepository>,
    event_bus: Arc<EventBus>,
}

impl SavedMovieService {
    pub fn new(saved_repo: Arc<dyn SavedMovieRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            saved_repo,
            event_bus,
        }
    }

    /// Save a movie for a user. Returns false when it was already saved.
    ///
    /// Entries are looked up by (user, movie) first, whatever id they were
    /// stored under. The create then uses an id derived from the pair, so two
    /// first saves racing each other collide in the store instead of both
    /// landing.
    pub async fn save_movie(&self, movie: &MovieDetails, user_id: &str) -> AppResult<bool> {
        let created = self
            .save_inner(movie, user_id)
            .await
            .inspect_err(|e| error!("save_movie({}, {}) failed: {}", movie.id, user_id, e))?;

        if created {
            info!("User {} saved movie {}", user_id, movie.id);
            self.event_bus.emit(MovieSaved::new(user_id.to_string(), movie.id));
        } else {
            info!("Movie {} already saved for user {}", movie.id, user_id);
        }
        Ok(created)
    }

    async fn save_inner(&self, movie: &MovieDetails, user_id: &str) -> AppResult<bool> {
        let saved = SavedMovie::new(movie, user_id);
        validate_saved_movie(&saved)?;

        if self.saved_repo.find(user_id, movie.id).await?.is_some() {
            return Ok(false);
        }

        let document_id = saved_movie_document_id(user_id, movie.id);
        match self.saved_repo.create(&saved, Some(document_id)).await {
            Ok(_) => Ok(true),
            Err(AppError::Conflict(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// A user's saved movies, newest first
    pub async fn list_saved_movies(&self, user_id: &str) -> AppResult<Vec<SavedMovie>> {
        self.list_inner(user_id)
            .await
            .inspect_err(|e| error!("list_saved_movies({}) failed: {}", user_id, e))
    }

    async fn list_inner(&self, user_id: &str) -> AppResult<Vec<SavedMovie>> {
        validate_user_id(user_id)?;
        self.saved_repo.list_by_user(user_id).await
    }

    pub async fn is_movie_saved(&self, movie_id: i64, user_id: &str) -> AppResult<bool> {
        self.is_saved_inner(movie_id, user_id)
            .await
            .inspect_err(|e| error!("is_movie_saved({}, {}) failed: {}", movie_id, user_id, e))
    }

    async fn is_saved_inner(&self, movie_id: i64, user_id: &str) -> AppResult<bool> {
        validate_user_id(user_id)?;
        Ok(self.saved_repo.find(user_id, movie_id).await?.is_some())
    }

    /// Delete the first matching saved entry. Returns false when there was
    /// none, including for ids no movie can have.
    pub async fn remove_saved_movie(&self, movie_id: i64, user_id: &str) -> AppResult<bool> {
        let removed = self
            .remove_inner(movie_id, user_id)
            .await
            .inspect_err(|e| error!("remove_saved_movie({}, {}) failed: {}", movie_id, user_id, e))?;

        if removed {
            info!("User {} removed saved movie {}", user_id, movie_id);
            self.event_bus
                .emit(SavedMovieRemoved::new(user_id.to_string(), movie_id));
        }
        Ok(removed)
    }

    async fn remove_inner(&self, movie_id: i64, user_id: &str) -> AppResult<bool> {
        validate_user_id(user_id)?;

        let Some(record) = self.saved_repo.find(user_id, movie_id).await? else {
            return Ok(false);
        };

        match self.saved_repo.delete(&record.document_id).await {
            Ok(()) => Ok(true),
            // Someone else deleted it between our read and delete
            Err(AppError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
