//! Storage Layer
//!
//! SQLite-backed implementations of the metadata store and feature store
//! collaborators. The pool is created once at startup and injected into the
//! components that need it; nothing here is looked up ambiently.

mod repository;

pub use repository::{Database, SqliteFeatureStore, SqliteMetadataStore};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
