// src/domain/mod.rs
//
// Domain Root - entities stored in the remote collections and the pure
// rules that govern them. Nothing in here touches the network.

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod favorites;
pub mod identity;
pub mod keys;
pub mod movie;
pub mod saved_movie;
pub mod search_count;
pub mod user_image;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Caller payloads
pub use movie::{poster_url, Movie, MovieDetails};

// Search counters
pub use search_count::{
    rank_trending, validate_search_count, validate_search_term, SearchCount, TrendingMovie,
    TRENDING_LIMIT,
};

// Saved movies
pub use saved_movie::{validate_saved_movie, SavedMovie};

// Profile image
pub use user_image::{validate_user_image, UserImage};

// Favorites
pub use favorites::{validate_favorites, FavoritesChange, FavoritesList};

pub use identity::{validate_movie_id, validate_user_id};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
