// src/repositories/favorites_repository.rs

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::domain::FavoritesList;
use crate::error::AppResult;
use crate::integrations::document_store::to_attributes;
use crate::integrations::{DocumentStore, Precondition, Query};
use crate::repositories::Record;

#[async_trait]
pub trait FavoritesRepository: Send + Sync {
    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<Record<FavoritesList>>>;
    async fn create(&self, list: &FavoritesList, document_id: Option<String>) -> AppResult<Record<FavoritesList>>;
    /// Replace the whole list, conditioned on the revision last read.
    /// `expected_revision` None means the stored list has no revision yet.
    async fn replace(
        &self,
        document_id: &str,
        favorites: &[String],
        expected_revision: Option<u64>,
        new_revision: u64,
    ) -> AppResult<()>;
}

pub struct RemoteFavoritesRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl RemoteFavoritesRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }
}

#[async_trait]
impl FavoritesRepository for RemoteFavoritesRepository {
    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<Record<FavoritesList>>> {
        let docs = self
            .store
            .list_documents(&self.collection, &[Query::equal("id", user_id), Query::limit(1)])
            .await?;

        docs.first().map(Record::from_document).transpose()
    }

    async fn create(&self, list: &FavoritesList, document_id: Option<String>) -> AppResult<Record<FavoritesList>> {
        let doc = self
            .store
            .create_document(&self.collection, document_id, to_attributes(list)?)
            .await?;
        Record::from_document(&doc)
    }

    async fn replace(
        &self,
        document_id: &str,
        favorites: &[String],
        expected_revision: Option<u64>,
        new_revision: u64,
    ) -> AppResult<()> {
        let mut patch = Map::new();
        patch.insert("favorites".to_string(), json!(favorites));
        patch.insert("revision".to_string(), json!(new_revision));

        let expected = expected_revision.map_or(Value::Null, |r| json!(r));

        self.store
            .update_document(
                &self.collection,
                document_id,
                patch,
                Some(Precondition::FieldEquals("revision".to_string(), expected)),
            )
            .await?;
        Ok(())
    }
}
