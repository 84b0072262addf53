// src/services/search_service.rs
use std::sync::Arc;

use log::{error, info, warn};

use crate::domain::keys::search_count_document_id;
use crate::domain::{
    rank_trending, validate_search_count, validate_search_term, Movie, SearchCount, TrendingMovie,
    TRENDING_LIMIT,
};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, SearchRecorded};
use crate::repositories::SearchCountRepository;

pub struct SearchService {
    search_repo: Arc<dyn SearchCountRepository>,
    event_bus: Arc<EventBus>,
    conflict_retries: u32,
}

impl SearchService {
    pub fn new(
        search_repo: Arc<dyn SearchCountRepository>,
        event_bus: Arc<EventBus>,
        conflict_retries: u32,
    ) -> Self {
        Self {
            search_repo,
            event_bus,
            conflict_retries,
        }
    }

    /// Count one search for `term`, returning the counter after the increment.
    ///
    /// The first search creates the counter under a key-derived document id,
    /// later ones compare-and-set `count`. Losing either race re-reads and
    /// tries again.
    pub async fn record_search(&self, term: &str, movie: &Movie) -> AppResult<SearchCount> {
        self.record_search_inner(term, movie)
            .await
            .inspect_err(|e| error!("record_search('{}') failed: {}", term, e))
    }

    async fn record_search_inner(&self, term: &str, movie: &Movie) -> AppResult<SearchCount> {
        validate_search_term(term)?;

        for attempt in 0..=self.conflict_retries {
            let outcome = match self.search_repo.find_by_term(term).await? {
                Some(existing) => {
                    let mut counter = existing.entity;
                    let expected = counter.count;
                    counter.count += 1;
                    validate_search_count(&counter)?;
                    self.search_repo
                        .compare_and_set_count(&existing.document_id, expected, counter.count)
                        .await
                        .map(|()| counter)
                }
                None => {
                    let counter = SearchCount::first(term, movie);
                    validate_search_count(&counter)?;
                    self.search_repo
                        .create(&counter, Some(search_count_document_id(term)))
                        .await
                        .map(|record| record.entity)
                }
            };

            match outcome {
                Ok(counter) => {
                    info!("Search '{}' counted ({})", term, counter.count);
                    self.event_bus
                        .emit(SearchRecorded::new(term.to_string(), counter.count));
                    return Ok(counter);
                }
                Err(AppError::Conflict(reason)) => {
                    warn!(
                        "record_search('{}') lost a race (attempt {}): {}",
                        term,
                        attempt + 1,
                        reason
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Conflict(format!(
            "search counter for '{}' still contended after {} attempts",
            term,
            self.conflict_retries + 1
        )))
    }

    /// The most searched terms, highest count first, at most five
    pub async fn list_trending(&self) -> AppResult<Vec<TrendingMovie>> {
        let counts = self
            .search_repo
            .list_top_by_count(TRENDING_LIMIT)
            .await
            .inspect_err(|e| error!("list_trending failed: {}", e))?;

        Ok(rank_trending(counts, TRENDING_LIMIT))
    }
}
