//! Deployed Model Metadata

use crate::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Latest deployed metadata row for a model type.
///
/// Never mutated by the serving core; the registry only reads it to decide
/// whether its cached artifact is still current.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_type: String,
    #[serde(default)]
    pub model_name: Option<String>,
    pub version: String,
    #[serde(default)]
    pub model_path: Option<String>,
    pub deployed: bool,
    #[serde(default)]
    pub deployed_at: Option<DateTime<Utc>>,
    /// Ordered feature names the artifact was trained against.
    #[serde(default)]
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub metrics: Option<Value>,
    #[serde(default)]
    pub hyperparameters: Option<Value>,
}

/// Metadata store collaborator boundary.
///
/// Implementations return the most recently deployed row for a model type
/// (`deployed = true`, ordered by deployment time descending, limit 1).
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn deployed(&self, model_type: &str) -> Result<Option<ModelMetadata>, StoreError>;
}
