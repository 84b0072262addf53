// src/domain/keys.rs
//
// Deterministic document identifiers.
//
// Every entity with a natural unique key gets a UUIDv5 document id derived
// from that key, so two first-writes for the same key collide in the store
// (409) instead of creating two documents.

use uuid::Uuid;

fn namespace(collection: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("moviesync:{}", collection).as_bytes())
}

/// Document id for the counter of a search term
pub fn search_count_document_id(search_term: &str) -> String {
    Uuid::new_v5(&namespace("search-counts"), search_term.as_bytes()).to_string()
}

/// Document id for a (user, movie) saved entry
pub fn saved_movie_document_id(user_id: &str, movie_id: i64) -> String {
    let key = format!("{}:{}", user_id, movie_id);
    Uuid::new_v5(&namespace("saved-movies"), key.as_bytes()).to_string()
}

/// Document id for a user's profile image
pub fn user_image_document_id(user_id: &str) -> String {
    Uuid::new_v5(&namespace("user-images"), user_id.as_bytes()).to_string()
}

/// Document id for a user's favorites list
pub fn favorites_document_id(user_id: &str) -> String {
    Uuid::new_v5(&namespace("favorites"), user_id.as_bytes()).to_string()
}
