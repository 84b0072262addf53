// src/integrations/document_store/racing.rs
//
// Test double: an in-memory store where "another device" gets its write in
// right before ours. Races fire on creates or updates, a set number of
// times, then the store behaves normally.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use super::{Document, DocumentStore, InMemoryDocumentStore, Precondition, Query};
use crate::error::AppResult;

/// Race forever
pub const ALWAYS: usize = usize::MAX;

/// What the competing device does
#[derive(Debug, Clone)]
pub enum Race {
    /// Create a document under the same id first
    DuplicateCreate(Map<String, Value>),
    /// Increment a numeric attribute of the target document
    Bump(String),
    /// Delete the target document
    Delete,
}

pub struct RacingStore {
    inner: Arc<InMemoryDocumentStore>,
    on_create: Option<(Race, AtomicUsize)>,
    on_update: Option<(Race, AtomicUsize)>,
    fired: AtomicUsize,
}

impl RacingStore {
    pub fn new(inner: Arc<InMemoryDocumentStore>) -> Self {
        Self {
            inner,
            on_create: None,
            on_update: None,
            fired: AtomicUsize::new(0),
        }
    }

    pub fn race_creates(mut self, race: Race, times: usize) -> Self {
        self.on_create = Some((race, AtomicUsize::new(times)));
        self
    }

    pub fn race_updates(mut self, race: Race, times: usize) -> Self {
        self.on_update = Some((race, AtomicUsize::new(times)));
        self
    }

    /// How many competing writes went in
    pub fn races_fired(&self) -> usize {
        self.fired.load(Ordering::SeqCst)
    }

    fn take(slot: &Option<(Race, AtomicUsize)>) -> Option<Race> {
        let (race, left) = slot.as_ref()?;
        let taken = left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| match n {
                0 => None,
                ALWAYS => Some(ALWAYS),
                n => Some(n - 1),
            })
            .is_ok();
        taken.then(|| race.clone())
    }

    async fn compete(&self, collection: &str, document_id: &str, race: Race) {
        self.fired.fetch_add(1, Ordering::SeqCst);
        match race {
            Race::DuplicateCreate(data) => {
                let _ = self
                    .inner
                    .create_document(collection, Some(document_id.to_string()), data)
                    .await;
            }
            Race::Bump(attribute) => {
                if let Ok(Some(doc)) = self.inner.get_document(collection, document_id).await {
                    let current = doc.data.get(&attribute).and_then(Value::as_i64).unwrap_or(0);
                    let mut patch = Map::new();
                    patch.insert(attribute, json!(current + 1));
                    let _ = self.inner.update_document(collection, document_id, patch, None).await;
                }
            }
            Race::Delete => {
                let _ = self.inner.delete_document(collection, document_id).await;
            }
        }
    }
}

#[async_trait]
impl DocumentStore for RacingStore {
    async fn list_documents(&self, collection: &str, queries: &[Query]) -> AppResult<Vec<Document>> {
        self.inner.list_documents(collection, queries).await
    }

    async fn get_document(&self, collection: &str, document_id: &str) -> AppResult<Option<Document>> {
        self.inner.get_document(collection, document_id).await
    }

    async fn create_document(
        &self,
        collection: &str,
        document_id: Option<String>,
        data: Map<String, Value>,
    ) -> AppResult<Document> {
        if let Some(id) = &document_id {
            if let Some(race) = Self::take(&self.on_create) {
                self.compete(collection, id, race).await;
            }
        }
        self.inner.create_document(collection, document_id, data).await
    }

    async fn update_document(
        &self,
        collection: &str,
        document_id: &str,
        patch: Map<String, Value>,
        precondition: Option<Precondition>,
    ) -> AppResult<Document> {
        if let Some(race) = Self::take(&self.on_update) {
            self.compete(collection, document_id, race).await;
        }
        self.inner
            .update_document(collection, document_id, patch, precondition)
            .await
    }

    async fn delete_document(&self, collection: &str, document_id: &str) -> AppResult<()> {
        self.inner.delete_document(collection, document_id).await
    }
}
