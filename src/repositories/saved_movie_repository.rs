// src/repositories/saved_movie_repository.rs

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::SavedMovie;
use crate::error::AppResult;
use crate::integrations::document_store::{to_attributes, CREATED_AT};
use crate::integrations::{DocumentStore, Query};
use crate::repositories::Record;

/// Page size used when walking a user's saved movies
pub const SAVED_PAGE_SIZE: usize = 100;

#[async_trait]
pub trait SavedMovieRepository: Send + Sync {
    async fn create(&self, saved: &SavedMovie, document_id: Option<String>) -> AppResult<Record<SavedMovie>>;
    /// All of a user's saved movies, newest first
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<SavedMovie>>;
    async fn find(&self, user_id: &str, movie_id: i64) -> AppResult<Option<Record<SavedMovie>>>;
    async fn delete(&self, document_id: &str) -> AppResult<()>;
}

pub struct RemoteSavedMovieRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl RemoteSavedMovieRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }
}

#[async_trait]
impl SavedMovieRepository for RemoteSavedMovieRepository {
    async fn create(&self, saved: &SavedMovie, document_id: Option<String>) -> AppResult<Record<SavedMovie>> {
        let doc = self
            .store
            .create_document(&self.collection, document_id, to_attributes(saved)?)
            .await?;
        Record::from_document(&doc)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<SavedMovie>> {
        let mut saved = Vec::new();
        let mut offset = 0;

        loop {
            let page = self
                .store
                .list_documents(
                    &self.collection,
                    &[
                        Query::equal("user_id", user_id),
                        Query::order_desc(CREATED_AT),
                        Query::limit(SAVED_PAGE_SIZE),
                        Query::offset(offset),
                    ],
                )
                .await?;

            let page_len = page.len();
            for doc in &page {
                let record: Record<SavedMovie> = Record::from_document(doc)?;
                let mut movie = record.entity;
                movie.saved_at = Some(record.created_at);
                saved.push(movie);
            }

            if page_len < SAVED_PAGE_SIZE {
                break;
            }
            offset += page_len;
        }

        Ok(saved)
    }

    async fn find(&self, user_id: &str, movie_id: i64) -> AppResult<Option<Record<SavedMovie>>> {
        let docs = self
            .store
            .list_documents(
                &self.collection,
                &[
                    Query::equal("movie_id", movie_id),
                    Query::equal("user_id", user_id),
                    Query::limit(1),
                ],
            )
            .await?;

        docs.first().map(Record::from_document).transpose()
    }

    async fn delete(&self, document_id: &str) -> AppResult<()> {
        self.store.delete_document(&self.collection, document_id).await
    }
}
