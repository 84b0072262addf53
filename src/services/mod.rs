// src/services/mod.rs
//
// Service layer
//
// Services own the rules of each collection: validation, retry on
// conflicting writes, and event emission once the store accepted a change.
// They talk to repositories only, never to the document store directly.

pub mod favorites_service;
pub mod profile_service;
pub mod saved_movie_service;
pub mod search_service;

#[cfg(test)]
mod favorites_service_tests;

pub use favorites_service::FavoritesService;
pub use profile_service::ProfileService;
pub use saved_movie_service::SavedMovieService;
pub use search_service::SearchService;
