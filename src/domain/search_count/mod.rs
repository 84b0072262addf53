pub mod entity;
pub mod invariants;

pub use entity::{rank_trending, SearchCount, TrendingMovie, TRENDING_LIMIT};
pub use invariants::{validate_search_count, validate_search_term};
