use serde::{Deserialize, Serialize};

/// A user's favorite movies, stored as one document per user.
///
/// `favorites` holds movie ids as strings in insertion order. Duplicates
/// are kept as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoritesList {
    #[serde(rename = "id")]
    pub user_id: String,

    #[serde(default)]
    pub favorites: Vec<String>,

    /// Write counter used as the optimistic concurrency token.
    /// Absent on lists written by older clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
}

impl FavoritesList {
    /// A brand-new list holding a single movie
    pub fn first(user_id: &str, movie_id: i64) -> Self {
        Self {
            user_id: user_id.to_string(),
            favorites: vec![movie_key(movie_id)],
            revision: Some(1),
        }
    }

    pub fn contains(&self, movie_id: i64) -> bool {
        let key = movie_key(movie_id);
        self.favorites.iter().any(|id| *id == key)
    }

    /// Revision the next successful write will carry
    pub fn next_revision(&self) -> u64 {
        self.revision.unwrap_or(0) + 1
    }

    /// Movie ids parsed back to numbers; entries that are not numbers are skipped
    pub fn movie_ids(&self) -> Vec<i64> {
        self.favorites.iter().filter_map(|id| id.parse().ok()).collect()
    }
}

/// String form a movie id takes inside the favorites list
pub fn movie_key(movie_id: i64) -> String {
    movie_id.to_string()
}
