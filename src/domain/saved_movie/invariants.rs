use super::entity::SavedMovie;
use crate::domain::identity::{validate_movie_id, validate_user_id};
use crate::domain::{DomainError, DomainResult};

/// Validates all SavedMovie invariants
pub fn validate_saved_movie(saved: &SavedMovie) -> DomainResult<()> {
    validate_user_id(&saved.user_id)?;
    validate_movie_id(saved.movie_id)?;
    if saved.title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Saved movie title cannot be empty".to_string(),
        ));
    }
    if let Some(vote) = saved.vote_average {
        if !(0.0..=10.0).contains(&vote) {
            return Err(DomainError::InvariantViolation(format!(
                "Vote average {} is outside 0..=10",
                vote
            )));
        }
    }
    Ok(())
}
