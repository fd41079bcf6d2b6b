//! Artifact Cache and Load Orchestration

use crate::{CachedArtifact, MetadataStore, ModelMetadata, RegistryError};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Cache view for health reporting.
#[derive(Debug, Clone)]
pub struct CacheEntryInfo {
    pub version: String,
    pub loaded_at: DateTime<Utc>,
}

/// Process-wide registry of loaded model artifacts.
///
/// At most one live entry per model type. Entries are replaced wholesale on
/// version change and handed out as `Arc` snapshots, so in-flight requests
/// keep a consistent artifact across concurrent invalidation.
pub struct ModelRegistry {
    store: Arc<dyn MetadataStore>,
    registry_dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<CachedArtifact>>>,
    // Per-type gates collapsing concurrent loads for the same model type.
    loads: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ModelRegistry {
    pub fn new(store: Arc<dyn MetadataStore>, registry_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            registry_dir: registry_dir.into(),
            cache: RwLock::new(HashMap::new()),
            loads: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached artifact for `model_type`, loading it when absent
    /// or when the deployed version moved on.
    ///
    /// A cache hit with a matching version performs no file I/O. Loads for
    /// different model types proceed in parallel; concurrent loads for the
    /// same type collapse into a single underlying load.
    pub async fn get_artifact(
        &self,
        model_type: &str,
    ) -> Result<Arc<CachedArtifact>, RegistryError> {
        let metadata = self
            .store
            .deployed(model_type)
            .await?
            .ok_or_else(|| RegistryError::NotDeployed {
                model_type: model_type.to_string(),
            })?;

        if let Some(entry) = self.cached_if_current(model_type, &metadata.version).await {
            return Ok(entry);
        }

        let gate = self.load_gate(model_type).await;
        let _guard = gate.lock().await;

        // A load that finished while we waited on the gate satisfies us too.
        if let Some(entry) = self.cached_if_current(model_type, &metadata.version).await {
            return Ok(entry);
        }

        let entry = Arc::new(self.load(metadata).await?);
        self.cache
            .write()
            .await
            .insert(model_type.to_string(), entry.clone());
        info!(
            model_type,
            version = %entry.version,
            "model artifact loaded and cached"
        );
        Ok(entry)
    }

    /// Remove one cache entry, or clear the whole cache.
    pub async fn invalidate(&self, model_type: Option<&str>) {
        let mut cache = self.cache.write().await;
        match model_type {
            Some(model_type) => {
                cache.remove(model_type);
                info!(model_type, "model cache entry invalidated");
            }
            None => {
                let entries = cache.len();
                cache.clear();
                info!(entries, "model cache cleared");
            }
        }
    }

    /// Current cache contents, for health reporting.
    pub async fn snapshot(&self) -> HashMap<String, CacheEntryInfo> {
        self.cache
            .read()
            .await
            .iter()
            .map(|(model_type, entry)| {
                (
                    model_type.clone(),
                    CacheEntryInfo {
                        version: entry.version.clone(),
                        loaded_at: entry.loaded_at,
                    },
                )
            })
            .collect()
    }

    async fn cached_if_current(
        &self,
        model_type: &str,
        version: &str,
    ) -> Option<Arc<CachedArtifact>> {
        let cache = self.cache.read().await;
        cache
            .get(model_type)
            .filter(|entry| entry.version == version)
            .cloned()
    }

    async fn load_gate(&self, model_type: &str) -> Arc<Mutex<()>> {
        let mut loads = self.loads.lock().await;
        loads
            .entry(model_type.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn load(&self, metadata: ModelMetadata) -> Result<CachedArtifact, RegistryError> {
        let model_path = metadata
            .model_path
            .clone()
            .filter(|path| !path.is_empty())
            .ok_or_else(|| RegistryError::PathMissing {
                model_type: metadata.model_type.clone(),
            })?;

        let path = self.resolve_path(&model_path)?;
        debug!(
            model_type = %metadata.model_type,
            path = %path.display(),
            "loading model artifact"
        );

        // Blocking file read off the async runtime.
        let read_path = path.clone();
        let bytes = tokio::task::spawn_blocking(move || std::fs::read(&read_path))
            .await
            .map_err(|e| RegistryError::Load(e.to_string()))?
            .map_err(|e| RegistryError::Load(format!("{}: {e}", path.display())))?;

        Ok(CachedArtifact::from_bundle_bytes(&bytes, metadata, Utc::now())?)
    }

    /// Resolve an artifact path: absolute as-is, otherwise relative to the
    /// registry directory, with a final fallback of the registry directory
    /// plus the file name alone.
    fn resolve_path(&self, model_path: &str) -> Result<PathBuf, RegistryError> {
        let raw = Path::new(model_path);
        let candidate = if raw.is_absolute() {
            raw.to_path_buf()
        } else {
            self.registry_dir.join(raw)
        };

        if candidate.exists() {
            return Ok(candidate);
        }

        if let Some(file_name) = candidate.file_name() {
            let alternate = self.registry_dir.join(file_name);
            if alternate.exists() {
                return Ok(alternate);
            }
        }

        Err(RegistryError::FileMissing {
            path: candidate.display().to_string(),
        })
    }
}
