use serde::{Deserialize, Serialize};

use crate::domain::movie::{poster_url, Movie};

/// How many entries the trending row shows
pub const TRENDING_LIMIT: usize = 5;

/// Per-term search counter.
/// One document per distinct search term; `count` starts at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCount {
    #[serde(rename = "searchTerm")]
    pub search_term: String,

    /// Movie that was on top of the results when the term was first searched
    pub movie_id: i64,

    pub count: i64,

    pub title: String,

    pub poster_url: String,
}

impl SearchCount {
    /// First sighting of a search term
    pub fn first(search_term: &str, movie: &Movie) -> Self {
        Self {
            search_term: search_term.to_string(),
            movie_id: movie.id,
            count: 1,
            title: movie.title.clone(),
            poster_url: poster_url(movie.poster_path.as_deref()),
        }
    }
}

/// Trending row entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingMovie {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub movie_id: i64,
    pub title: String,
    pub count: i64,
    pub poster_url: String,
}

impl From<SearchCount> for TrendingMovie {
    fn from(sc: SearchCount) -> Self {
        Self {
            search_term: sc.search_term,
            movie_id: sc.movie_id,
            title: sc.title,
            count: sc.count,
            poster_url: sc.poster_url,
        }
    }
}

/// Orders counters by count (highest first) and keeps at most `limit`.
///
/// The sort is stable, so counters with equal counts keep the order the
/// store returned them in.
pub fn rank_trending(mut counts: Vec<SearchCount>, limit: usize) -> Vec<TrendingMovie> {
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts.into_iter().map(TrendingMovie::from).collect()
}
