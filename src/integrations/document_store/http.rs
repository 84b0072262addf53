// src/integrations/document_store/http.rs
//
// Hosted document store over HTTPS.
//
// ARCHITECTURE:
// - REST client for the databases API of the configured project
// - One database, collections addressed by id
// - Maps HTTP failures into the shared error taxonomy:
//     404 -> NotFound, 409 -> Conflict, anything else -> Backend
//   and network failures into Transport
//
// The REST API has no conditional update. Preconditions are checked with a
// fetch-compare-patch sequence, which narrows the race window but cannot
// close it; the in-memory store checks them atomically.

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{header, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{Document, DocumentStore, Precondition, Query};
use crate::config::StoreConfig;
use crate::error::{AppError, AppResult};

/// Placeholder id asking the store to generate one
const UNIQUE_ID: &str = "unique()";

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[allow(dead_code)] // Part of the list response schema
    total: u64,
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

pub struct HttpDocumentStore {
    base_url: String,
    database_id: String,
    project_id: String,
    api_key: Option<String>,
    http_client: Client,
}

impl HttpDocumentStore {
    pub fn new(config: &StoreConfig) -> AppResult<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base_url: config.endpoint.clone(),
            database_id: config.database_id.clone(),
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
            http_client,
        })
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url, self.database_id, collection
        )
    }

    fn document_url(&self, collection: &str, document_id: &str) -> String {
        format!("{}/{}", self.documents_url(collection), document_id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut request = self
            .http_client
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .header("X-Appwrite-Project", &self.project_id);

        if let Some(key) = &self.api_key {
            request = request.header("X-Appwrite-Key", key);
        }

        request
    }

    /// Send and return the raw body of a successful response
    async fn send(&self, request: RequestBuilder) -> AppResult<String> {
        let response = request.send().await.map_err(|e| {
            error!("Document store request failed: {}", e);
            AppError::Transport(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = error_for_status(status.as_u16(), &body);
            debug!("Document store returned {}: {}", status, err);
            return Err(err);
        }

        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let body = self.send(request).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Build the query-string pairs for a list request
fn query_pairs(queries: &[Query]) -> Vec<(String, String)> {
    queries
        .iter()
        .enumerate()
        .map(|(i, q)| (format!("queries[{}]", i), q.to_wire()))
        .collect()
}

/// Map a non-success response to an error
fn error_for_status(status: u16, body: &str) -> AppError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => match parsed.kind {
            Some(kind) => format!("{} ({})", parsed.message, kind),
            None => parsed.message,
        },
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    };

    match status {
        404 => AppError::NotFound,
        409 => AppError::Conflict(message),
        _ => AppError::Backend { status, message },
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn list_documents(&self, collection: &str, queries: &[Query]) -> AppResult<Vec<Document>> {
        let request = self
            .request(Method::GET, &self.documents_url(collection))
            .query(&query_pairs(queries));

        let list: DocumentList = self.send_json(request).await?;

        Ok(list
            .documents
            .into_iter()
            .map(Document::strip_system_fields)
            .collect())
    }

    async fn get_document(&self, collection: &str, document_id: &str) -> AppResult<Option<Document>> {
        let request = self.request(Method::GET, &self.document_url(collection, document_id));

        match self.send_json::<Document>(request).await {
            Ok(doc) => Ok(Some(doc.strip_system_fields())),
            Err(AppError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_document(
        &self,
        collection: &str,
        document_id: Option<String>,
        data: Map<String, Value>,
    ) -> AppResult<Document> {
        let body = json!({
            "documentId": document_id.as_deref().unwrap_or(UNIQUE_ID),
            "data": data,
        });

        let request = self
            .request(Method::POST, &self.documents_url(collection))
            .json(&body);

        let doc: Document = self.send_json(request).await?;
        Ok(doc.strip_system_fields())
    }

    async fn update_document(
        &self,
        collection: &str,
        document_id: &str,
        patch: Map<String, Value>,
        precondition: Option<Precondition>,
    ) -> AppResult<Document> {
        if let Some(precondition) = precondition {
            let current = self
                .get_document(collection, document_id)
                .await?
                .ok_or(AppError::NotFound)?;

            if !precondition.holds(&current) {
                return Err(AppError::Conflict(format!(
                    "precondition {:?} failed for {}/{}",
                    precondition, collection, document_id
                )));
            }
        }

        let request = self
            .request(Method::PATCH, &self.document_url(collection, document_id))
            .json(&json!({ "data": patch }));

        let doc: Document = self.send_json(request).await?;
        Ok(doc.strip_system_fields())
    }

    async fn delete_document(&self, collection: &str, document_id: &str) -> AppResult<()> {
        let request = self.request(Method::DELETE, &self.document_url(collection, document_id));
        self.send(request).await?;
        Ok(())
    }
}
