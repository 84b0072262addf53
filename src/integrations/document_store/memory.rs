// src/integrations/document_store/memory.rs
//
// In-process document store.
//
// Mirrors the hosted store closely enough to run every service against it:
// equality filters, ordering (system timestamps included), offset, the
// default page size, id conflicts on create, and preconditions, which are
// checked atomically under the store lock.

use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::document::values_equal;
use super::{Document, DocumentStore, Precondition, Query};
use crate::error::{AppError, AppResult};

/// Page size applied when a list request carries no limit
pub const DEFAULT_LIST_LIMIT: usize = 25;

type InjectedFailure = Box<dyn FnOnce() -> AppError + Send>;

#[derive(Default)]
struct State {
    /// Documents per collection, in creation order
    collections: HashMap<String, Vec<Document>>,
    last_timestamp: Option<DateTime<Utc>>,
    failures: VecDeque<InjectedFailure>,
}

impl State {
    /// Strictly increasing timestamps so creation order is always recoverable
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(next);
        next
    }

    fn take_failure(&mut self) -> AppResult<()> {
        match self.failures.pop_front() {
            Some(failure) => Err(failure()),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct InMemoryDocumentStore {
    state: Mutex<State>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next store call fail with the produced error
    pub fn fail_next<F>(&self, failure: F)
    where
        F: FnOnce() -> AppError + Send + 'static,
    {
        if let Ok(mut state) = self.state.lock() {
            state.failures.push_back(Box::new(failure));
        }
    }

    /// Number of documents currently in a collection
    pub fn document_count(&self, collection: &str) -> usize {
        self.state
            .lock()
            .map(|state| state.collections.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| AppError::Other("In-memory store lock poisoned".to_string()))
    }
}

fn compare_attribute(a: &Document, b: &Document, attribute: &str) -> Ordering {
    match attribute {
        "$createdAt" => a.created_at.cmp(&b.created_at),
        "$updatedAt" => a.updated_at.cmp(&b.updated_at),
        _ => compare_values(
            a.data.get(attribute).unwrap_or(&Value::Null),
            b.data.get(attribute).unwrap_or(&Value::Null),
        ),
    }
}

/// Nulls first, then numbers by value, strings lexically, booleans false < true
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn matches(document: &Document, queries: &[Query]) -> bool {
    queries.iter().all(|query| match query {
        Query::Equal(attribute, expected) => document
            .attribute(attribute)
            .map_or(false, |value| values_equal(&value, expected)),
        _ => true,
    })
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list_documents(&self, collection: &str, queries: &[Query]) -> AppResult<Vec<Document>> {
        let mut state = self.lock()?;
        state.take_failure()?;

        let mut found: Vec<Document> = state
            .collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matches(d, queries)).cloned().collect())
            .unwrap_or_default();

        let orders: Vec<(&str, bool)> = queries
            .iter()
            .filter_map(|q| match q {
                Query::OrderAsc(attribute) => Some((attribute.as_str(), false)),
                Query::OrderDesc(attribute) => Some((attribute.as_str(), true)),
                _ => None,
            })
            .collect();

        if !orders.is_empty() {
            found.sort_by(|a, b| {
                orders
                    .iter()
                    .map(|(attribute, descending)| {
                        let ord = compare_attribute(a, b, attribute);
                        if *descending {
                            ord.reverse()
                        } else {
                            ord
                        }
                    })
                    .find(|ord| *ord != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        let offset = queries
            .iter()
            .find_map(|q| match q {
                Query::Offset(n) => Some(*n),
                _ => None,
            })
            .unwrap_or(0);
        let limit = queries
            .iter()
            .find_map(|q| match q {
                Query::Limit(n) => Some(*n),
                _ => None,
            })
            .unwrap_or(DEFAULT_LIST_LIMIT);

        Ok(found.into_iter().skip(offset).take(limit).collect())
    }

    async fn get_document(&self, collection: &str, document_id: &str) -> AppResult<Option<Document>> {
        let mut state = self.lock()?;
        state.take_failure()?;

        Ok(state
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == document_id))
            .cloned())
    }

    async fn create_document(
        &self,
        collection: &str,
        document_id: Option<String>,
        data: Map<String, Value>,
    ) -> AppResult<Document> {
        let mut state = self.lock()?;
        state.take_failure()?;

        let id = document_id.unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        let exists = state
            .collections
            .get(collection)
            .map_or(false, |docs| docs.iter().any(|d| d.id == id));
        if exists {
            return Err(AppError::Conflict(format!(
                "Document {} already exists in {}",
                id, collection
            )));
        }

        let now = state.tick();
        let document = Document {
            id,
            created_at: now,
            updated_at: now,
            data,
        };

        debug!("memory store: created {}/{}", collection, document.id);
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());

        Ok(document)
    }

    async fn update_document(
        &self,
        collection: &str,
        document_id: &str,
        patch: Map<String, Value>,
        precondition: Option<Precondition>,
    ) -> AppResult<Document> {
        let mut state = self.lock()?;
        state.take_failure()?;

        let now = state.tick();
        let document = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == document_id))
            .ok_or(AppError::NotFound)?;

        if let Some(precondition) = precondition {
            if !precondition.holds(document) {
                return Err(AppError::Conflict(format!(
                    "precondition {:?} failed for {}/{}",
                    precondition, collection, document_id
                )));
            }
        }

        document.data.extend(patch);
        document.updated_at = now;

        debug!("memory store: updated {}/{}", collection, document_id);
        Ok(document.clone())
    }

    async fn delete_document(&self, collection: &str, document_id: &str) -> AppResult<()> {
        let mut state = self.lock()?;
        state.take_failure()?;

        let docs = state.collections.get_mut(collection).ok_or(AppError::NotFound)?;
        let index = docs
            .iter()
            .position(|d| d.id == document_id)
            .ok_or(AppError::NotFound)?;
        docs.remove(index);

        debug!("memory store: deleted {}/{}", collection, document_id);
        Ok(())
    }
}
