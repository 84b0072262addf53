// src/events/mod.rs
//
// Change notifications - Public API

pub mod bus;
pub mod types;

pub use bus::{EventBus, EventLogEntry};

pub use types::{
    DomainEvent,
    // Favorites
    FavoriteAdded,
    FavoriteRemoved,
    // Saved movies
    MovieSaved,
    // Profile
    ProfileImageUploaded,
    SavedMovieRemoved,
    // Search
    SearchRecorded,
};
