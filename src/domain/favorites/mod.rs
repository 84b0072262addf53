//! Favorites invariants:
//!
//! 1. One list document per user
//! 2. Entries are movie ids in string form, in insertion order
//! 3. Adding does not de-duplicate
//! 4. Removing drops every occurrence
//! 5. Every write carries the next revision

pub mod entity;
pub mod merge;

pub use entity::{movie_key, FavoritesList};
pub use merge::{append_favorite, remove_favorite, FavoritesChange};

use crate::domain::identity::validate_user_id;
use crate::domain::DomainResult;

/// Validates FavoritesList invariants
pub fn validate_favorites(list: &FavoritesList) -> DomainResult<()> {
    validate_user_id(&list.user_id)
}
