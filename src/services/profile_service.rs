// src/services/profile_service.rs
use std::sync::Arc;

use log::{error, info, warn};

use crate::domain::keys::user_image_document_id;
use crate::domain::{validate_user_id, validate_user_image, UserImage};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, ProfileImageUploaded};
use crate::repositories::UserImageRepository;

pub struct ProfileService {
    image_repo: Arc<dyn UserImageRepository>,
    event_bus: Arc<EventBus>,
    conflict_retries: u32,
}

impl ProfileService {
    pub fn new(
        image_repo: Arc<dyn UserImageRepository>,
        event_bus: Arc<EventBus>,
        conflict_retries: u32,
    ) -> Self {
        Self {
            image_repo,
            event_bus,
            conflict_retries,
        }
    }

    /// Store the user's profile image url, replacing any previous one
    pub async fn upload_user_image(&self, user_id: &str, profile_url: &str) -> AppResult<()> {
        self.upsert(&UserImage::new(user_id, profile_url))
            .await
            .inspect_err(|e| error!("upload_user_image({}) failed: {}", user_id, e))?;

        info!("Uploaded profile image for {}: {}", user_id, profile_url);
        self.event_bus.emit(ProfileImageUploaded::new(
            user_id.to_string(),
            profile_url.to_string(),
        ));
        Ok(())
    }

    async fn upsert(&self, image: &UserImage) -> AppResult<()> {
        validate_user_image(image)?;

        for attempt in 0..=self.conflict_retries {
            let outcome = match self.image_repo.find_by_user(&image.user_id).await? {
                Some(existing) => {
                    self.image_repo
                        .set_profile_url(&existing.document_id, &image.profile_url)
                        .await
                }
                None => self
                    .image_repo
                    .create(image, Some(user_image_document_id(&image.user_id)))
                    .await
                    .map(|_| ()),
            };

            match outcome {
                Ok(()) => return Ok(()),
                // Created or deleted under us; look again
                Err(AppError::Conflict(_)) | Err(AppError::NotFound) => {
                    warn!(
                        "upload_user_image({}) raced (attempt {})",
                        image.user_id,
                        attempt + 1
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Conflict(format!(
            "profile image for {} still contended after {} attempts",
            image.user_id,
            self.conflict_retries + 1
        )))
    }

    /// The user's profile image url, `None` when none was ever uploaded
    pub async fn get_user_image(&self, user_id: &str) -> AppResult<Option<String>> {
        self.find_url(user_id)
            .await
            .inspect_err(|e| error!("get_user_image({}) failed: {}", user_id, e))
    }

    async fn find_url(&self, user_id: &str) -> AppResult<Option<String>> {
        validate_user_id(user_id)?;
        let record = self.image_repo.find_by_user(user_id).await?;
        Ok(record.map(|r| r.entity.profile_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::integrations::document_store::racing::{Race, RacingStore, ALWAYS};
    use crate::integrations::{DocumentStore, InMemoryDocumentStore};
    use crate::repositories::RemoteUserImageRepository;

    fn service(store: Arc<InMemoryDocumentStore>) -> ProfileService {
        service_over(store, 3)
    }

    fn service_over(store: Arc<dyn DocumentStore>, retries: u32) -> ProfileService {
        let repo = Arc::new(RemoteUserImageRepository::new(store, "images"));
        ProfileService::new(repo, Arc::new(EventBus::new()), retries)
    }

    fn other_device_upload() -> Race {
        match json!({"id": "u1", "profile_url": "https://utfs.io/f/other.png"}) {
            serde_json::Value::Object(data) => Race::DuplicateCreate(data),
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_missing_image_is_none() {
        let service = service(Arc::new(InMemoryDocumentStore::new()));
        assert_eq!(service.get_user_image("u1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upload_then_get() {
        let service = service(Arc::new(InMemoryDocumentStore::new()));
        service
            .upload_user_image("u1", "https://utfs.io/f/one.png")
            .await
            .unwrap();

        assert_eq!(
            service.get_user_image("u1").await.unwrap().as_deref(),
            Some("https://utfs.io/f/one.png")
        );
    }

    #[tokio::test]
    async fn test_reupload_replaces() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let service = service(store.clone());

        service.upload_user_image("u1", "https://utfs.io/f/one.png").await.unwrap();
        service.upload_user_image("u1", "https://utfs.io/f/two.png").await.unwrap();

        assert_eq!(store.document_count("images"), 1);
        assert_eq!(
            service.get_user_image("u1").await.unwrap().as_deref(),
            Some("https://utfs.io/f/two.png")
        );
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let service = service(store.clone());

        let err = service.upload_user_image("u1", "not a url").await.unwrap_err();
        assert!(matches!(err, AppError::Domain(_)));
        assert_eq!(store.document_count("images"), 0);
    }

    #[tokio::test]
    async fn test_lost_create_race_overwrites() {
        let inner = Arc::new(InMemoryDocumentStore::new());
        let racing = Arc::new(RacingStore::new(inner.clone()).race_creates(other_device_upload(), 1));
        let service = service_over(racing.clone(), 3);

        service.upload_user_image("u1", "https://utfs.io/f/mine.png").await.unwrap();

        assert_eq!(racing.races_fired(), 1);
        assert_eq!(inner.document_count("images"), 1);
        assert_eq!(
            service.get_user_image("u1").await.unwrap().as_deref(),
            Some("https://utfs.io/f/mine.png")
        );
    }

    #[tokio::test]
    async fn test_gives_up_when_always_outpaced() {
        // Every create loses to another device, every overwrite finds the
        // image deleted again
        let inner = Arc::new(InMemoryDocumentStore::new());
        let racing = Arc::new(
            RacingStore::new(inner)
                .race_creates(other_device_upload(), ALWAYS)
                .race_updates(Race::Delete, ALWAYS),
        );
        let bus = Arc::new(EventBus::new());
        let repo = Arc::new(RemoteUserImageRepository::new(racing.clone(), "images"));
        let service = ProfileService::new(repo, bus.clone(), 2);

        let err = service
            .upload_user_image("u1", "https://utfs.io/f/mine.png")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(racing.races_fired(), 3);
        assert!(bus.get_event_log().is_empty());
    }

    #[tokio::test]
    async fn test_blank_user_lookup_is_rejected() {
        let service = service(Arc::new(InMemoryDocumentStore::new()));
        assert!(matches!(service.get_user_image(" ").await, Err(AppError::Domain(_))));
    }
}
