// src/events/types.rs
//
// Change notifications emitted after the remote store accepted a write.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only what a screen needs to refresh

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trait that all events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    fn event_id(&self) -> Uuid;
    fn occurred_at(&self) -> DateTime<Utc>;
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// SEARCH EVENTS
// ============================================================================

/// A search term was counted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecorded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub search_term: String,
    pub count: i64,
}

impl SearchRecorded {
    pub fn new(search_term: String, count: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            search_term,
            count,
        }
    }
}

impl DomainEvent for SearchRecorded {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "SearchRecorded" }
}

// ============================================================================
// SAVED MOVIE EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSaved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: String,
    pub movie_id: i64,
}

impl MovieSaved {
    pub fn new(user_id: String, movie_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            movie_id,
        }
    }
}

impl DomainEvent for MovieSaved {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "MovieSaved" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedMovieRemoved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: String,
    pub movie_id: i64,
}

impl SavedMovieRemoved {
    pub fn new(user_id: String, movie_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            movie_id,
        }
    }
}

impl DomainEvent for SavedMovieRemoved {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "SavedMovieRemoved" }
}

// ============================================================================
// PROFILE EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileImageUploaded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: String,
    pub profile_url: String,
}

impl ProfileImageUploaded {
    pub fn new(user_id: String, profile_url: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            profile_url,
        }
    }
}

impl DomainEvent for ProfileImageUploaded {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ProfileImageUploaded" }
}

// ============================================================================
// FAVORITES EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteAdded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: String,
    pub movie_id: i64,
}

impl FavoriteAdded {
    pub fn new(user_id: String, movie_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            movie_id,
        }
    }
}

impl DomainEvent for FavoriteAdded {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "FavoriteAdded" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRemoved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: String,
    pub movie_id: i64,
}

impl FavoriteRemoved {
    pub fn new(user_id: String, movie_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            movie_id,
        }
    }
}

impl DomainEvent for FavoriteRemoved {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "FavoriteRemoved" }
}
