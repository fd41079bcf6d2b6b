//! Model Registry
//!
//! Process-wide cache of loaded model artifacts keyed by model type. Entries
//! refresh when the deployed version changes and load failures are classified
//! so the orchestrator can decide between model and rule-based paths.

mod artifact;
mod metadata;
mod registry;

pub use artifact::{ArtifactError, CachedArtifact, LinearModel, Predictor, StandardScaler};
pub use metadata::{MetadataStore, ModelMetadata};
pub use registry::{CacheEntryInfo, ModelRegistry};

use thiserror::Error;

/// Errors from the metadata store collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Metadata store query failed: {0}")]
    Query(String),
}

/// Registry-level failures surfaced to the prediction orchestrator
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("No deployed model found for type '{model_type}'")]
    NotDeployed { model_type: String },
    #[error("Model path missing for type '{model_type}'")]
    PathMissing { model_type: String },
    #[error("Model file not found: {path}")]
    FileMissing { path: String },
    #[error("Model artifact load failed: {0}")]
    Load(String),
    #[error("Model artifact error: {0}")]
    Artifact(#[from] ArtifactError),
    #[error("Metadata store error: {0}")]
    Store(#[from] StoreError),
}

impl RegistryError {
    /// Whether this failure is an expected serving condition (no deployment,
    /// missing file) as opposed to an inference fault. Expected conditions
    /// surface verbatim as the fallback reason.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            RegistryError::NotDeployed { .. }
                | RegistryError::PathMissing { .. }
                | RegistryError::FileMissing { .. }
        )
    }
}
