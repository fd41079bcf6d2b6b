//! Feature Record Resolution

use crate::{FeatureRecord, StoreError};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Feature store collaborator boundary.
///
/// Implementations return the newest record for a subject at a given feature
/// schema version, ordered by extraction time descending.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    async fn latest(
        &self,
        subject_id: &str,
        feature_version: &str,
    ) -> Result<Option<FeatureRecord>, StoreError>;
}

/// Resolves feature records against a configured default schema version.
pub struct FeatureResolver {
    store: Arc<dyn FeatureStore>,
    default_version: String,
}

impl FeatureResolver {
    pub fn new(store: Arc<dyn FeatureStore>, default_version: impl Into<String>) -> Self {
        Self {
            store,
            default_version: default_version.into(),
        }
    }

    /// The feature schema version used when a request does not name one.
    pub fn default_version(&self) -> &str {
        &self.default_version
    }

    /// Fetch the latest feature record for a subject.
    ///
    /// Returns `Ok(None)` when the store holds no record for the
    /// subject/version pair; callers decide whether that is fatal.
    pub async fn resolve(
        &self,
        subject_id: &str,
        feature_version: Option<&str>,
    ) -> Result<Option<FeatureRecord>, StoreError> {
        let version = feature_version.unwrap_or(&self.default_version);
        let record = self.store.latest(subject_id, version).await?;
        debug!(
            subject_id,
            feature_version = version,
            found = record.is_some(),
            "resolved feature record"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureMap;
    use std::sync::Mutex;

    struct RecordingStore {
        requested: Mutex<Vec<(String, String)>>,
        record: Option<FeatureRecord>,
    }

    #[async_trait]
    impl FeatureStore for RecordingStore {
        async fn latest(
            &self,
            subject_id: &str,
            feature_version: &str,
        ) -> Result<Option<FeatureRecord>, StoreError> {
            self.requested
                .lock()
                .unwrap()
                .push((subject_id.to_string(), feature_version.to_string()));
            Ok(self.record.clone())
        }
    }

    fn record_for(subject: &str) -> FeatureRecord {
        FeatureRecord {
            subject_id: subject.to_string(),
            feature_version: "1.0.0".to_string(),
            extraction_timestamp: None,
            features: FeatureMap::default(),
        }
    }

    #[tokio::test]
    async fn resolve_uses_default_version_when_unspecified() {
        let store = Arc::new(RecordingStore {
            requested: Mutex::new(Vec::new()),
            record: Some(record_for("s-1")),
        });
        let resolver = FeatureResolver::new(store.clone(), "1.0.0");

        let record = resolver.resolve("s-1", None).await.unwrap();
        assert!(record.is_some());
        assert_eq!(
            store.requested.lock().unwrap().as_slice(),
            &[("s-1".to_string(), "1.0.0".to_string())]
        );
    }

    #[tokio::test]
    async fn resolve_prefers_explicit_version() {
        let store = Arc::new(RecordingStore {
            requested: Mutex::new(Vec::new()),
            record: None,
        });
        let resolver = FeatureResolver::new(store.clone(), "1.0.0");

        let record = resolver.resolve("s-2", Some("2.1.0")).await.unwrap();
        assert!(record.is_none());
        assert_eq!(
            store.requested.lock().unwrap().as_slice(),
            &[("s-2".to_string(), "2.1.0".to_string())]
        );
    }
}
