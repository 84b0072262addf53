// src/domain/identity.rs
//
// Caller-supplied identifiers.
// User ids come from the auth provider and are opaque; movie ids are
// catalogue ids and always positive.

use crate::domain::{DomainError, DomainResult};

pub fn validate_user_id(user_id: &str) -> DomainResult<()> {
    if user_id.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "User id cannot be empty".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_movie_id(movie_id: i64) -> DomainResult<()> {
    if movie_id <= 0 {
        return Err(DomainError::InvariantViolation(format!(
            "Movie id must be positive, got {}",
            movie_id
        )));
    }
    Ok(())
}
