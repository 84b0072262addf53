// src/integrations/document_store/mod.rs
//
// Remote document store access.
//
// ARCHITECTURE:
// - `DocumentStore` is the injectable handle every repository talks to
// - `HttpDocumentStore` speaks the hosted REST API
// - `InMemoryDocumentStore` is a complete local stand-in (tests, --memory)
//
// RULES:
// - Stores know collections and documents, never entities
// - Absence of a document addressed by id is `Ok(None)` from `get_document`;
//   mutations of a missing document fail with `AppError::NotFound`
// - A create with an id that already exists fails with `AppError::Conflict`

pub mod document;
pub mod http;
pub mod memory;
pub mod query;

#[cfg(test)]
pub(crate) mod racing;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::AppResult;

pub use document::{to_attributes, Document, Precondition};
pub use http::HttpDocumentStore;
pub use memory::InMemoryDocumentStore;
pub use query::{Query, CREATED_AT};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents of a collection matching every query
    async fn list_documents(&self, collection: &str, queries: &[Query]) -> AppResult<Vec<Document>>;

    async fn get_document(&self, collection: &str, document_id: &str) -> AppResult<Option<Document>>;

    /// Create a document; the store assigns an id when `document_id` is None
    async fn create_document(
        &self,
        collection: &str,
        document_id: Option<String>,
        data: Map<String, Value>,
    ) -> AppResult<Document>;

    /// Partial update: only the attributes in `patch` change
    async fn update_document(
        &self,
        collection: &str,
        document_id: &str,
        patch: Map<String, Value>,
        precondition: Option<Precondition>,
    ) -> AppResult<Document>;

    async fn delete_document(&self, collection: &str, document_id: &str) -> AppResult<()>;
}
