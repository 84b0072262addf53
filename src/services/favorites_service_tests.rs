// src/services/favorites_service_tests.rs
//
// Favorites behavior and concurrency.
//
// Covers:
// - add / check / remove round trips
// - append semantics (no de-duplication)
// - the lost update a plain read-modify-write suffers under interleaving
// - that revision-checked writes survive the same interleaving

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::{json, Map, Value};

    use crate::error::{AppError, AppResult};
    use crate::events::EventBus;
    use crate::integrations::{Document, DocumentStore, InMemoryDocumentStore, Precondition, Query};
    use crate::repositories::{FavoritesRepository, RemoteFavoritesRepository};
    use crate::services::FavoritesService;

    const COLLECTION: &str = "favorites";

    // ========================================================================
    // TEST HELPERS
    // ========================================================================

    fn service_over(store: Arc<dyn DocumentStore>, retries: u32) -> (FavoritesService, Arc<EventBus>) {
        let bus = Arc::new(EventBus::new());
        let repo = Arc::new(RemoteFavoritesRepository::new(store, COLLECTION));
        (FavoritesService::new(repo, bus.clone(), retries), bus)
    }

    fn attrs(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    /// Wraps a store and lets "another device" append a movie right before
    /// our next conditional update lands.
    struct InterleavingStore {
        inner: Arc<InMemoryDocumentStore>,
        competing_movie: i64,
        /// How many of our updates get raced; usize::MAX races forever
        races_left: AtomicUsize,
        raced: AtomicBool,
    }

    impl InterleavingStore {
        fn new(inner: Arc<InMemoryDocumentStore>, competing_movie: i64, races: usize) -> Self {
            Self {
                inner,
                competing_movie,
                races_left: AtomicUsize::new(races),
                raced: AtomicBool::new(false),
            }
        }

        async fn competing_append(&self, document_id: &str) {
            let current = self.inner.get_document(COLLECTION, document_id).await.unwrap().unwrap();
            let mut favorites: Vec<Value> = current.data["favorites"].as_array().unwrap().clone();
            favorites.push(json!(self.competing_movie.to_string()));
            let revision = current.data.get("revision").cloned().unwrap_or(Value::Null);
            let next_revision = revision.as_u64().unwrap_or(0) + 1;

            self.inner
                .update_document(
                    COLLECTION,
                    document_id,
                    attrs(json!({"favorites": favorites, "revision": next_revision})),
                    Some(Precondition::FieldEquals("revision".to_string(), revision)),
                )
                .await
                .unwrap();
        }
    }

    #[async_trait]
    impl DocumentStore for InterleavingStore {
        async fn list_documents(&self, c: &str, q: &[Query]) -> AppResult<Vec<Document>> {
            self.inner.list_documents(c, q).await
        }
        async fn get_document(&self, c: &str, id: &str) -> AppResult<Option<Document>> {
            self.inner.get_document(c, id).await
        }
        async fn create_document(&self, c: &str, id: Option<String>, d: Map<String, Value>) -> AppResult<Document> {
            self.inner.create_document(c, id, d).await
        }
        async fn update_document(
            &self,
            c: &str,
            id: &str,
            p: Map<String, Value>,
            pre: Option<Precondition>,
        ) -> AppResult<Document> {
            let left = self.races_left.load(Ordering::SeqCst);
            if left > 0 {
                if left != usize::MAX {
                    self.races_left.store(left - 1, Ordering::SeqCst);
                }
                self.raced.store(true, Ordering::SeqCst);
                self.competing_append(id).await;
            }
            self.inner.update_document(c, id, p, pre).await
        }
        async fn delete_document(&self, c: &str, id: &str) -> AppResult<()> {
            self.inner.delete_document(c, id).await
        }
    }

    // ========================================================================
    // ROUND TRIPS
    // ========================================================================

    #[tokio::test]
    async fn test_add_then_is_favorite() {
        let (service, bus) = service_over(Arc::new(InMemoryDocumentStore::new()), 3);

        assert!(!service.is_favorite("u1", 550).await.unwrap());
        service.add_to_favorites("u1", 550).await.unwrap();

        assert!(service.is_favorite("u1", 550).await.unwrap());
        assert!(!service.is_favorite("u2", 550).await.unwrap());
        assert_eq!(bus.get_event_log()[0].event_type, "FavoriteAdded");
    }

    #[tokio::test]
    async fn test_add_remove_round_trip() {
        let (service, _) = service_over(Arc::new(InMemoryDocumentStore::new()), 3);

        service.add_to_favorites("u1", 550).await.unwrap();
        service.add_to_favorites("u1", 13).await.unwrap();
        service.remove_from_favorites("u1", 550).await.unwrap();

        assert!(!service.is_favorite("u1", 550).await.unwrap());
        assert_eq!(service.list_favorites("u1").await.unwrap(), vec![13]);
    }

    #[tokio::test]
    async fn test_adding_twice_lists_movie_twice() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let (service, _) = service_over(store.clone(), 3);

        service.add_to_favorites("u1", 550).await.unwrap();
        service.add_to_favorites("u1", 550).await.unwrap();

        assert_eq!(service.list_favorites("u1").await.unwrap(), vec![550, 550]);
        assert_eq!(store.document_count(COLLECTION), 1);

        // One removal clears both entries
        service.remove_from_favorites("u1", 550).await.unwrap();
        assert!(!service.is_favorite("u1", 550).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_without_list_is_no_op() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let (service, bus) = service_over(store.clone(), 3);

        service.remove_from_favorites("u1", 550).await.unwrap();

        assert_eq!(store.document_count(COLLECTION), 0);
        assert!(bus.get_event_log().is_empty());
    }

    #[tokio::test]
    async fn test_toggle() {
        let (service, _) = service_over(Arc::new(InMemoryDocumentStore::new()), 3);

        assert!(service.toggle_favorite("u1", 680).await.unwrap());
        assert!(service.is_favorite("u1", 680).await.unwrap());
        assert!(!service.toggle_favorite("u1", 680).await.unwrap());
        assert!(!service.is_favorite("u1", 680).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_written_by_older_client() {
        let store = Arc::new(InMemoryDocumentStore::new());
        store
            .create_document(COLLECTION, None, attrs(json!({"id": "u1", "favorites": ["5"]})))
            .await
            .unwrap();
        let (service, _) = service_over(store.clone(), 3);

        service.add_to_favorites("u1", 6).await.unwrap();

        assert_eq!(service.list_favorites("u1").await.unwrap(), vec![5, 6]);
        let docs = store.list_documents(COLLECTION, &[]).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].data["revision"], 1);
    }

    // ========================================================================
    // CONCURRENCY
    // ========================================================================

    /// Plain read-modify-write, two devices interleaved: the first write is lost.
    #[tokio::test]
    async fn test_unconditional_read_modify_write_loses_update() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let doc = store
            .create_document(COLLECTION, None, attrs(json!({"id": "u1", "favorites": ["1"]})))
            .await
            .unwrap();

        // Both devices read the same list
        let seen_by_a = store.get_document(COLLECTION, &doc.id).await.unwrap().unwrap();
        let seen_by_b = store.get_document(COLLECTION, &doc.id).await.unwrap().unwrap();

        let mut list_a: Vec<Value> = seen_by_a.data["favorites"].as_array().unwrap().clone();
        list_a.push(json!("2"));
        let mut list_b: Vec<Value> = seen_by_b.data["favorites"].as_array().unwrap().clone();
        list_b.push(json!("3"));

        store
            .update_document(COLLECTION, &doc.id, attrs(json!({"favorites": list_a})), None)
            .await
            .unwrap();
        store
            .update_document(COLLECTION, &doc.id, attrs(json!({"favorites": list_b})), None)
            .await
            .unwrap();

        let final_list = store.get_document(COLLECTION, &doc.id).await.unwrap().unwrap();
        assert_eq!(final_list.data["favorites"], json!(["1", "3"]));
    }

    /// Same interleaving through the service: the conditional write loses,
    /// re-reads, and both movies survive.
    #[tokio::test]
    async fn test_revision_checked_write_survives_interleaving() {
        let inner = Arc::new(InMemoryDocumentStore::new());
        let (seed, _) = service_over(inner.clone(), 3);
        seed.add_to_favorites("u1", 1).await.unwrap();

        let racing = Arc::new(InterleavingStore::new(inner.clone(), 3, 1));
        let (service, _) = service_over(racing.clone(), 3);

        service.add_to_favorites("u1", 2).await.unwrap();

        assert!(racing.raced.load(Ordering::SeqCst));
        let list = stored_list_from(&inner, "u1").await;
        assert_eq!(list, vec!["1", "3", "2"]);
    }

    #[tokio::test]
    async fn test_removal_survives_interleaving() {
        let inner = Arc::new(InMemoryDocumentStore::new());
        let (seed, _) = service_over(inner.clone(), 3);
        seed.add_to_favorites("u1", 1).await.unwrap();
        seed.add_to_favorites("u1", 2).await.unwrap();

        let racing = Arc::new(InterleavingStore::new(inner.clone(), 7, 1));
        let (service, _) = service_over(racing, 3);

        service.remove_from_favorites("u1", 1).await.unwrap();

        assert_eq!(stored_list_from(&inner, "u1").await, vec!["2", "7"]);
    }

    #[tokio::test]
    async fn test_gives_up_after_retries() {
        let inner = Arc::new(InMemoryDocumentStore::new());
        let (seed, _) = service_over(inner.clone(), 3);
        seed.add_to_favorites("u1", 1).await.unwrap();

        let racing = Arc::new(InterleavingStore::new(inner, 9, usize::MAX));
        let (service, bus) = service_over(racing, 2);

        let err = service.add_to_favorites("u1", 2).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(err.to_string().contains("3 attempts"));
        assert!(bus.get_event_log().is_empty());
    }

    /// Another device toggled the same movie on first: our toggle sees its
    /// write on retry and turns the movie back off instead of listing it twice.
    #[tokio::test]
    async fn test_racing_toggles_cancel_out() {
        let inner = Arc::new(InMemoryDocumentStore::new());
        let (seed, _) = service_over(inner.clone(), 3);
        seed.add_to_favorites("u1", 1).await.unwrap();

        let racing = Arc::new(InterleavingStore::new(inner.clone(), 2, 1));
        let (service, bus) = service_over(racing.clone(), 3);

        let now_favorite = service.toggle_favorite("u1", 2).await.unwrap();

        assert!(racing.raced.load(Ordering::SeqCst));
        assert!(!now_favorite);
        assert_eq!(stored_list_from(&inner, "u1").await, vec!["1"]);
        assert_eq!(bus.get_event_log()[0].event_type, "FavoriteRemoved");
    }

    #[tokio::test]
    async fn test_blank_user_is_rejected_everywhere() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let (service, _) = service_over(store.clone(), 3);

        assert!(matches!(service.add_to_favorites("", 1).await, Err(AppError::Domain(_))));
        assert!(matches!(service.is_favorite(" ", 1).await, Err(AppError::Domain(_))));
        assert!(matches!(service.list_favorites("").await, Err(AppError::Domain(_))));
        assert!(matches!(service.toggle_favorite("u1", 0).await, Err(AppError::Domain(_))));
        assert_eq!(store.document_count(COLLECTION), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_from_many_tasks_all_land() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let (service, _) = service_over(store.clone(), 16);
        let service = Arc::new(service);

        let mut handles = Vec::new();
        for movie_id in 1..=8 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.add_to_favorites("u1", movie_id).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut ids = service.list_favorites("u1").await.unwrap();
        ids.sort();
        assert_eq!(ids, (1..=8).collect::<Vec<i64>>());
        assert_eq!(store.document_count(COLLECTION), 1);
    }

    async fn stored_list_from(store: &Arc<InMemoryDocumentStore>, user_id: &str) -> Vec<String> {
        let repo = RemoteFavoritesRepository::new(store.clone(), COLLECTION);
        repo.find_by_user(user_id)
            .await
            .unwrap()
            .map(|r| r.entity.favorites)
            .unwrap_or_default()
    }
}
