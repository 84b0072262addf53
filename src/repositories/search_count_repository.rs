// src/repositories/search_count_repository.rs

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map};

use crate::domain::SearchCount;
use crate::error::AppResult;
use crate::integrations::document_store::to_attributes;
use crate::integrations::{DocumentStore, Precondition, Query};
use crate::repositories::Record;

#[async_trait]
pub trait SearchCountRepository: Send + Sync {
    async fn find_by_term(&self, search_term: &str) -> AppResult<Option<Record<SearchCount>>>;
    async fn create(
        &self,
        search_count: &SearchCount,
        document_id: Option<String>,
    ) -> AppResult<Record<SearchCount>>;
    /// Set `count` to `new_count` only if it still equals `expected_count`
    async fn compare_and_set_count(
        &self,
        document_id: &str,
        expected_count: i64,
        new_count: i64,
    ) -> AppResult<()>;
    async fn list_top_by_count(&self, limit: usize) -> AppResult<Vec<SearchCount>>;
}

pub struct RemoteSearchCountRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl RemoteSearchCountRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }
}

#[async_trait]
impl SearchCountRepository for RemoteSearchCountRepository {
    async fn find_by_term(&self, search_term: &str) -> AppResult<Option<Record<SearchCount>>> {
        let docs = self
            .store
            .list_documents(
                &self.collection,
                &[Query::equal("searchTerm", search_term), Query::limit(1)],
            )
            .await?;

        docs.first().map(Record::from_document).transpose()
    }

    async fn create(
        &self,
        search_count: &SearchCount,
        document_id: Option<String>,
    ) -> AppResult<Record<SearchCount>> {
        let doc = self
            .store
            .create_document(&self.collection, document_id, to_attributes(search_count)?)
            .await?;
        Record::from_document(&doc)
    }

    async fn compare_and_set_count(
        &self,
        document_id: &str,
        expected_count: i64,
        new_count: i64,
    ) -> AppResult<()> {
        let mut patch = Map::new();
        patch.insert("count".to_string(), json!(new_count));

        self.store
            .update_document(
                &self.collection,
                document_id,
                patch,
                Some(Precondition::field_equals("count", expected_count)),
            )
            .await?;
        Ok(())
    }

    async fn list_top_by_count(&self, limit: usize) -> AppResult<Vec<SearchCount>> {
        let docs = self
            .store
            .list_documents(
                &self.collection,
                &[Query::limit(limit), Query::order_desc("count")],
            )
            .await?;

        docs.iter().map(|d| d.decode()).collect()
    }
}
