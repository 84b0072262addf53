use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::movie::MovieDetails;

/// A movie a user bookmarked for later.
/// Intended unique per (movie_id, user_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedMovie {
    pub movie_id: i64,
    pub user_id: String,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,

    /// Store creation timestamp; filled in on read, never written
    #[serde(skip_serializing, default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl SavedMovie {
    pub fn new(movie: &MovieDetails, user_id: &str) -> Self {
        Self {
            movie_id: movie.id,
            user_id: user_id.to_string(),
            title: movie.title.clone(),
            poster_path: movie.poster_path.clone(),
            release_date: movie.release_date.clone(),
            vote_average: movie.vote_average,
            saved_at: None,
        }
    }
}
