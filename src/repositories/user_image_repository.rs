// src/repositories/user_image_repository.rs

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map};

use crate::domain::UserImage;
use crate::error::AppResult;
use crate::integrations::document_store::to_attributes;
use crate::integrations::{DocumentStore, Query};
use crate::repositories::Record;

#[async_trait]
pub trait UserImageRepository: Send + Sync {
    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<Record<UserImage>>>;
    async fn create(&self, image: &UserImage, document_id: Option<String>) -> AppResult<Record<UserImage>>;
    async fn set_profile_url(&self, document_id: &str, profile_url: &str) -> AppResult<()>;
}

pub struct RemoteUserImageRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl RemoteUserImageRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }
}

#[async_trait]
impl UserImageRepository for RemoteUserImageRepository {
    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<Record<UserImage>>> {
        let docs = self
            .store
            .list_documents(&self.collection, &[Query::equal("id", user_id), Query::limit(1)])
            .await?;

        docs.first().map(Record::from_document).transpose()
    }

    async fn create(&self, image: &UserImage, document_id: Option<String>) -> AppResult<Record<UserImage>> {
        let doc = self
            .store
            .create_document(&self.collection, document_id, to_attributes(image)?)
            .await?;
        Record::from_document(&doc)
    }

    async fn set_profile_url(&self, document_id: &str, profile_url: &str) -> AppResult<()> {
        let mut patch = Map::new();
        patch.insert("profile_url".to_string(), json!(profile_url));

        self.store
            .update_document(&self.collection, document_id, patch, None)
            .await?;
        Ok(())
    }
}
