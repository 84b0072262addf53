// src/integrations/mod.rs
//
// External Integrations Module

pub mod document_store;

pub use document_store::{
    Document, DocumentStore, HttpDocumentStore, InMemoryDocumentStore, Precondition, Query,
};
