// src/domain/movie.rs
//
// Movie payloads handed in by callers.
// These are NOT stored as-is; each collection keeps its own projection.

use serde::{Deserialize, Serialize};

/// Base URL for poster images at the width used by trending cards
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// A movie as returned by a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub poster_path: Option<String>,
}

/// A movie as shown on its detail screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
}

impl MovieDetails {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            release_date: None,
            vote_average: None,
        }
    }
}

impl From<&MovieDetails> for Movie {
    fn from(details: &MovieDetails) -> Self {
        Self {
            id: details.id,
            title: details.title.clone(),
            poster_path: details.poster_path.clone(),
        }
    }
}

/// Full poster URL for a relative poster path.
///
/// A missing path yields the bare base URL, which is what the mobile
/// client has always stored in that case.
pub fn poster_url(poster_path: Option<&str>) -> String {
    format!("{}{}", POSTER_BASE_URL, poster_path.unwrap_or_default())
}
