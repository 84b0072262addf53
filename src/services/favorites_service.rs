// src/services/favorites_service.rs
//
// Favorites are one list document per user, rewritten whole on every change.
// Each rewrite is conditioned on the revision that was read; a writer that
// loses the race re-reads and re-applies its change, so concurrent adds and
// removes from several devices are never silently dropped.
use std::sync::Arc;

use log::{error, info, warn};

use crate::domain::keys::favorites_document_id;
use crate::domain::{
    validate_favorites, validate_movie_id, validate_user_id, FavoritesChange, FavoritesList,
};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, FavoriteAdded, FavoriteRemoved};
use crate::repositories::FavoritesRepository;

pub struct FavoritesService {
    favorites_repo: Arc<dyn FavoritesRepository>,
    event_bus: Arc<EventBus>,
    conflict_retries: u32,
}

impl FavoritesService {
    pub fn new(
        favorites_repo: Arc<dyn FavoritesRepository>,
        event_bus: Arc<EventBus>,
        conflict_retries: u32,
    ) -> Self {
        Self {
            favorites_repo,
            event_bus,
            conflict_retries,
        }
    }

    /// Append a movie to the user's favorites, creating the list on first use.
    /// Adding a movie that is already there lists it twice.
    pub async fn add_to_favorites(&self, user_id: &str, movie_id: i64) -> AppResult<()> {
        self.change(user_id, FavoritesChange::Add(movie_id))
            .await
            .inspect_err(|e| error!("add_to_favorites({}, {}) failed: {}", user_id, movie_id, e))?;
        Ok(())
    }

    /// Remove every occurrence of a movie. No-op when there is no list or
    /// the movie isn't in it.
    pub async fn remove_from_favorites(&self, user_id: &str, movie_id: i64) -> AppResult<()> {
        self.change(user_id, FavoritesChange::Remove(movie_id))
            .await
            .inspect_err(|e| {
                error!("remove_from_favorites({}, {}) failed: {}", user_id, movie_id, e)
            })?;
        Ok(())
    }

    pub async fn is_favorite(&self, user_id: &str, movie_id: i64) -> AppResult<bool> {
        self.read_list(user_id)
            .await
            .map(|list| list.map_or(false, |list| list.contains(movie_id)))
            .inspect_err(|e| error!("is_favorite({}, {}) failed: {}", user_id, movie_id, e))
    }

    /// The user's favorite movie ids in insertion order; empty without a list
    pub async fn list_favorites(&self, user_id: &str) -> AppResult<Vec<i64>> {
        self.read_list(user_id)
            .await
            .map(|list| list.map(|list| list.movie_ids()).unwrap_or_default())
            .inspect_err(|e| error!("list_favorites({}) failed: {}", user_id, e))
    }

    /// Flip the favorite state of a movie, returning the new state.
    ///
    /// The flip is decided against the list each write attempt read, so two
    /// toggles racing each other cancel out instead of both adding.
    pub async fn toggle_favorite(&self, user_id: &str, movie_id: i64) -> AppResult<bool> {
        let written = self
            .change(user_id, FavoritesChange::Toggle(movie_id))
            .await
            .inspect_err(|e| error!("toggle_favorite({}, {}) failed: {}", user_id, movie_id, e))?;

        Ok(written.map_or(false, |list| list.contains(movie_id)))
    }

    async fn read_list(&self, user_id: &str) -> AppResult<Option<FavoritesList>> {
        validate_user_id(user_id)?;
        let record = self.favorites_repo.find_by_user(user_id).await?;
        Ok(record.map(|r| r.entity))
    }

    /// Validate, write and announce one change. Returns the list as written,
    /// or None when nothing changed.
    async fn change(&self, user_id: &str, change: FavoritesChange) -> AppResult<Option<FavoritesList>> {
        validate_user_id(user_id)?;
        if !matches!(change, FavoritesChange::Remove(_)) {
            validate_movie_id(change.movie_id())?;
        }

        let written = self.apply(user_id, change).await?;

        if let Some(list) = &written {
            let movie_id = change.movie_id();
            if list.contains(movie_id) && !matches!(change, FavoritesChange::Remove(_)) {
                info!("User {} favorited movie {}", user_id, movie_id);
                self.event_bus
                    .emit(FavoriteAdded::new(user_id.to_string(), movie_id));
            } else {
                info!("User {} unfavorited movie {}", user_id, movie_id);
                self.event_bus
                    .emit(FavoriteRemoved::new(user_id.to_string(), movie_id));
            }
        }
        Ok(written)
    }

    /// Apply a change with revision-checked writes
    async fn apply(&self, user_id: &str, change: FavoritesChange) -> AppResult<Option<FavoritesList>> {
        for attempt in 0..=self.conflict_retries {
            let (outcome, written) = match self.favorites_repo.find_by_user(user_id).await? {
                None => {
                    if matches!(change, FavoritesChange::Remove(_)) {
                        return Ok(None);
                    }
                    let list = FavoritesList::first(user_id, change.movie_id());
                    validate_favorites(&list)?;
                    let outcome = self
                        .favorites_repo
                        .create(&list, Some(favorites_document_id(user_id)))
                        .await
                        .map(|_| ());
                    (outcome, list)
                }
                Some(record) => {
                    let current = record.entity;
                    let next = change.apply(&current.favorites);
                    if next == current.favorites {
                        return Ok(None);
                    }
                    let next_revision = current.next_revision();
                    let outcome = self
                        .favorites_repo
                        .replace(&record.document_id, &next, current.revision, next_revision)
                        .await;
                    let written = FavoritesList {
                        user_id: current.user_id,
                        favorites: next,
                        revision: Some(next_revision),
                    };
                    (outcome, written)
                }
            };

            match outcome {
                Ok(()) => return Ok(Some(written)),
                Err(AppError::Conflict(reason)) => {
                    warn!(
                        "favorites of {} changed concurrently (attempt {}): {}",
                        user_id,
                        attempt + 1,
                        reason
                    );
                }
                // List deleted out from under us
                Err(AppError::NotFound) => {
                    warn!("favorites of {} vanished mid-update (attempt {})", user_id, attempt + 1);
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Conflict(format!(
            "favorites of {} still contended after {} attempts",
            user_id,
            self.conflict_retries + 1
        )))
    }
}
