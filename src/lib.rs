// src/lib.rs
// MovieSync - keeps a movie app's per-user data in a hosted document store
//
// Architecture:
// - Domain-centric: entities and their rules live in domain/, no I/O
// - Explicit: the store handle is constructed and injected, never global
// - Optimistic: concurrent writers are detected by the store, not by locks
// - Event-driven: every accepted mutation is announced on the event bus
// - Application layer: one facade applying each operation's failure policy

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod integrations;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    poster_url,
    // Favorites
    FavoritesList,
    // Payloads
    Movie,
    MovieDetails,
    // Saved movies
    SavedMovie,
    // Search counters
    SearchCount,
    TrendingMovie,
    // Profile
    UserImage,
};

// ============================================================================
// PUBLIC API - Errors & configuration
// ============================================================================

pub use config::{CollectionIds, StoreConfig};
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    DomainEvent, EventBus, EventLogEntry, FavoriteAdded, FavoriteRemoved,
    MovieSaved, ProfileImageUploaded, SavedMovieRemoved, SearchRecorded,
};

// ============================================================================
// PUBLIC API - Store
// ============================================================================

pub use integrations::{
    Document, DocumentStore, HttpDocumentStore, InMemoryDocumentStore, Precondition, Query,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{ErrorResponse, ErrorType, Synchronizer};
