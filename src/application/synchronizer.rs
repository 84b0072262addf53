// src/application/synchronizer.rs
//
// Synchronizer - the caller-facing facade
//
// RULES:
// - Primitive identifiers in, plain values out
// - Never contains business logic; every call lands in one service
// - Owns the per-operation failure policy: most operations propagate,
//   trending and the saved list degrade, the saved check fails closed
//
// Underlying errors are already logged by the services.

use std::sync::Arc;

use log::{info, warn};

use crate::config::StoreConfig;
use crate::domain::{Movie, MovieDetails, SavedMovie, SearchCount, TrendingMovie};
use crate::error::AppResult;
use crate::events::EventBus;
use crate::integrations::{DocumentStore, HttpDocumentStore, InMemoryDocumentStore};
use crate::repositories::{
    RemoteFavoritesRepository, RemoteSavedMovieRepository, RemoteSearchCountRepository,
    RemoteUserImageRepository,
};
use crate::services::{FavoritesService, ProfileService, SavedMovieService, SearchService};

pub struct Synchronizer {
    event_bus: Arc<EventBus>,
    search_service: SearchService,
    saved_movie_service: SavedMovieService,
    profile_service: ProfileService,
    favorites_service: FavoritesService,
}

impl Synchronizer {
    /// Wire every repository and service over one store handle
    pub fn new(store: Arc<dyn DocumentStore>, config: &StoreConfig, event_bus: Arc<EventBus>) -> Self {
        let collections = &config.collections;
        let retries = config.conflict_retries;

        let search_repo = Arc::new(RemoteSearchCountRepository::new(
            Arc::clone(&store),
            collections.search_counts.as_str(),
        ));
        let saved_repo = Arc::new(RemoteSavedMovieRepository::new(
            Arc::clone(&store),
            collections.saved_movies.as_str(),
        ));
        let image_repo = Arc::new(RemoteUserImageRepository::new(
            Arc::clone(&store),
            collections.user_images.as_str(),
        ));
        let favorites_repo = Arc::new(RemoteFavoritesRepository::new(
            store,
            collections.favorites.as_str(),
        ));

        Self {
            search_service: SearchService::new(search_repo, Arc::clone(&event_bus), retries),
            saved_movie_service: SavedMovieService::new(saved_repo, Arc::clone(&event_bus)),
            profile_service: ProfileService::new(image_repo, Arc::clone(&event_bus), retries),
            favorites_service: FavoritesService::new(favorites_repo, Arc::clone(&event_bus), retries),
            event_bus,
        }
    }

    /// Synchronizer talking to the hosted store
    pub fn from_config(config: &StoreConfig) -> AppResult<Self> {
        let store = HttpDocumentStore::new(config)?;
        info!("Synchronizer ready against {}", config.endpoint);
        Ok(Self::new(Arc::new(store), config, Arc::new(EventBus::new())))
    }

    /// Synchronizer over a fresh in-process store
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryDocumentStore::new()),
            &StoreConfig::local(),
            Arc::new(EventBus::new()),
        )
    }

    /// Bus carrying change notifications for every accepted mutation
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    // ========================================================================
    // SEARCH COUNTERS
    // ========================================================================

    pub async fn record_search(&self, term: &str, movie: &Movie) -> AppResult<SearchCount> {
        self.search_service.record_search(term, movie).await
    }

    /// Top searched movies; empty when the store can't be reached
    pub async fn list_trending(&self) -> Vec<TrendingMovie> {
        self.search_service.list_trending().await.unwrap_or_else(|e| {
            warn!("Trending unavailable, showing nothing: {}", e);
            Vec::new()
        })
    }

    // ========================================================================
    // SAVED MOVIES
    // ========================================================================

    /// Returns false when the movie was already saved
    pub async fn save_movie(&self, movie: &MovieDetails, user_id: &str) -> AppResult<bool> {
        self.saved_movie_service.save_movie(movie, user_id).await
    }

    /// Newest first. `None` means the list could not be loaded, which is
    /// different from an empty list.
    pub async fn list_saved_movies(&self, user_id: &str) -> Option<Vec<SavedMovie>> {
        self.saved_movie_service
            .list_saved_movies(user_id)
            .await
            .inspect_err(|e| warn!("Saved movies of {} unavailable: {}", user_id, e))
            .ok()
    }

    pub async fn is_movie_saved(&self, movie_id: i64, user_id: &str) -> bool {
        self.saved_movie_service
            .is_movie_saved(movie_id, user_id)
            .await
            .unwrap_or_else(|e| {
                warn!("Saved check for {} failed, reporting unsaved: {}", movie_id, e);
                false
            })
    }

    /// Returns whether a document was deleted
    pub async fn remove_saved_movie(&self, movie_id: i64, user_id: &str) -> AppResult<bool> {
        self.saved_movie_service.remove_saved_movie(movie_id, user_id).await
    }

    // ========================================================================
    // PROFILE IMAGE
    // ========================================================================

    pub async fn upload_user_image(&self, user_id: &str, profile_url: &str) -> AppResult<()> {
        self.profile_service.upload_user_image(user_id, profile_url).await
    }

    pub async fn get_user_image(&self, user_id: &str) -> AppResult<Option<String>> {
        self.profile_service.get_user_image(user_id).await
    }

    // ========================================================================
    // FAVORITES
    // ========================================================================

    pub async fn add_to_favorites(&self, user_id: &str, movie_id: i64) -> AppResult<()> {
        self.favorites_service.add_to_favorites(user_id, movie_id).await
    }

    pub async fn is_favorite(&self, user_id: &str, movie_id: i64) -> AppResult<bool> {
        self.favorites_service.is_favorite(user_id, movie_id).await
    }

    pub async fn remove_from_favorites(&self, user_id: &str, movie_id: i64) -> AppResult<()> {
        self.favorites_service.remove_from_favorites(user_id, movie_id).await
    }

    pub async fn list_favorites(&self, user_id: &str) -> AppResult<Vec<i64>> {
        self.favorites_service.list_favorites(user_id).await
    }

    pub async fn toggle_favorite(&self, user_id: &str, movie_id: i64) -> AppResult<bool> {
        self.favorites_service.toggle_favorite(user_id, movie_id).await
    }
}
