// src/domain/favorites/merge.rs
//
// Pure list rules for favorites. Services re-apply these to a freshly read
// list whenever a conditional write loses a race, so they must only depend
// on the list they are given.

use serde::{Deserialize, Serialize};

use super::entity::movie_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FavoritesChange {
    Add(i64),
    Remove(i64),
    /// Remove when present, append otherwise
    Toggle(i64),
}

impl FavoritesChange {
    pub fn movie_id(&self) -> i64 {
        match self {
            FavoritesChange::Add(id) | FavoritesChange::Remove(id) | FavoritesChange::Toggle(id) => *id,
        }
    }

    /// Apply this change to `current`, producing the full replacement list
    pub fn apply(&self, current: &[String]) -> Vec<String> {
        match self {
            FavoritesChange::Add(id) => append_favorite(current, *id),
            FavoritesChange::Remove(id) => remove_favorite(current, *id),
            FavoritesChange::Toggle(id) => {
                if current.contains(&movie_key(*id)) {
                    remove_favorite(current, *id)
                } else {
                    append_favorite(current, *id)
                }
            }
        }
    }
}

/// Appends unconditionally; an id already present ends up listed twice
pub fn append_favorite(current: &[String], movie_id: i64) -> Vec<String> {
    let mut next = current.to_vec();
    next.push(movie_key(movie_id));
    next
}

/// Drops every occurrence of the id, preserving the order of the rest
pub fn remove_favorite(current: &[String], movie_id: i64) -> Vec<String> {
    let key = movie_key(movie_id);
    current.iter().filter(|id| **id != key).cloned().collect()
}
