use super::entity::SearchCount;
use crate::domain::{DomainError, DomainResult};

/// Validates a search term before it is counted
pub fn validate_search_term(term: &str) -> DomainResult<()> {
    if term.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Search term cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates all SearchCount invariants
pub fn validate_search_count(sc: &SearchCount) -> DomainResult<()> {
    validate_search_term(&sc.search_term)?;
    if sc.count < 1 {
        return Err(DomainError::InvariantViolation(format!(
            "Search count for '{}' must be at least 1, got {}",
            sc.search_term, sc.count
        )));
    }
    Ok(())
}
