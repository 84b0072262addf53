// src/config.rs
//
// Store configuration
//
// Everything is read from the process environment. The binary loads an
// optional `.env` first; the library never touches files.

use std::env;
use std::time::Duration;

use log::{debug, info};

use crate::error::{AppError, AppResult};

pub const DEFAULT_ENDPOINT: &str = "https://cloud.appwrite.io/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONFLICT_RETRIES: u32 = 5;

/// Collection ids inside the configured database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionIds {
    pub search_counts: String,
    pub saved_movies: String,
    pub user_images: String,
    pub favorites: String,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub endpoint: String,
    pub project_id: String,
    /// Server key; requests go out unauthenticated (project-scoped) without it
    pub api_key: Option<String>,
    pub database_id: String,
    pub collections: CollectionIds,
    pub timeout: Duration,
    /// How many times a conditional write is re-attempted after a conflict
    pub conflict_retries: u32,
}

impl StoreConfig {
    /// Load from `MOVIESYNC_*` environment variables
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> AppResult<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::Config(format!("{} is not set", key)))
        };

        let endpoint = lookup("MOVIESYNC_ENDPOINT")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| {
                debug!("MOVIESYNC_ENDPOINT not set, using default: {}", DEFAULT_ENDPOINT);
                DEFAULT_ENDPOINT.to_string()
            });

        let timeout_secs = parse_or(&lookup, "MOVIESYNC_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let conflict_retries =
            parse_or(&lookup, "MOVIESYNC_CONFLICT_RETRIES", DEFAULT_CONFLICT_RETRIES)?;

        let config = Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: required("MOVIESYNC_PROJECT_ID")?,
            api_key: lookup("MOVIESYNC_API_KEY").filter(|v| !v.trim().is_empty()),
            database_id: required("MOVIESYNC_DATABASE_ID")?,
            collections: CollectionIds {
                search_counts: required("MOVIESYNC_SEARCH_COLLECTION_ID")?,
                saved_movies: required("MOVIESYNC_SAVED_COLLECTION_ID")?,
                user_images: required("MOVIESYNC_IMAGES_COLLECTION_ID")?,
                favorites: required("MOVIESYNC_FAVORITES_COLLECTION_ID")?,
            },
            timeout: Duration::from_secs(timeout_secs),
            conflict_retries,
        };

        info!(
            "Store config loaded: endpoint={} project={} database={}",
            config.endpoint, config.project_id, config.database_id
        );
        Ok(config)
    }

    /// Config for running against the in-memory store
    pub fn local() -> Self {
        Self {
            endpoint: "memory://local".to_string(),
            project_id: "local".to_string(),
            api_key: None,
            database_id: "local".to_string(),
            collections: CollectionIds {
                search_counts: "search_counts".to_string(),
                saved_movies: "saved_movies".to_string(),
                user_images: "user_images".to_string(),
                favorites: "favorites".to_string(),
            },
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            conflict_retries: DEFAULT_CONFLICT_RETRIES,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", key, raw, e))),
        _ => Ok(default),
    }
}
