//! SQLite Store Implementations

use crate::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feature_resolver::{FeatureMap, FeatureRecord, FeatureStore};
use model_registry::{MetadataStore, ModelMetadata};
use serde_json::{Map, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

/// Connection pool plus schema bootstrap.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to a SQLite database URL (e.g. `sqlite://learnpulse.db?mode=rwc`).
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        info!(url, "connecting to database");
        let pool = SqlitePoolOptions::new().connect(url).await?;
        Ok(Self { pool })
    }

    /// In-memory database on a single connection, for tests and local runs.
    pub async fn connect_in_memory() -> Result<Self, StorageError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    /// Create the collaborator tables when absent.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ml_model_versions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                model_type TEXT NOT NULL,
                model_name TEXT,
                version TEXT NOT NULL,
                model_path TEXT,
                deployed INTEGER NOT NULL DEFAULT 0,
                deployed_at TEXT,
                feature_names TEXT,
                metrics TEXT,
                hyperparameters TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ml_feature_store (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subject_id TEXT NOT NULL,
                feature_version TEXT NOT NULL,
                extraction_timestamp TEXT,
                features TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("schema bootstrap complete");
        Ok(())
    }

    pub fn metadata_store(&self) -> SqliteMetadataStore {
        SqliteMetadataStore {
            pool: self.pool.clone(),
        }
    }

    pub fn feature_store(&self) -> SqliteFeatureStore {
        SqliteFeatureStore {
            pool: self.pool.clone(),
        }
    }

    /// Record a model version row; used by deployment tooling and tests.
    pub async fn record_model_version(&self, metadata: &ModelMetadata) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO ml_model_versions
                (model_type, model_name, version, model_path, deployed, deployed_at,
                 feature_names, metrics, hyperparameters)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&metadata.model_type)
        .bind(&metadata.model_name)
        .bind(&metadata.version)
        .bind(&metadata.model_path)
        .bind(metadata.deployed)
        .bind(metadata.deployed_at)
        .bind(serde_json::to_string(&metadata.feature_names)?)
        .bind(metadata.metrics.as_ref().map(Value::to_string))
        .bind(metadata.hyperparameters.as_ref().map(Value::to_string))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Record a feature snapshot row; used by extraction tooling and tests.
    pub async fn record_feature_snapshot(
        &self,
        record: &FeatureRecord,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO ml_feature_store
                (subject_id, feature_version, extraction_timestamp, features)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&record.subject_id)
        .bind(&record.feature_version)
        .bind(record.extraction_timestamp)
        .bind(serde_json::to_string(record.features.inner())?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// `MetadataStore` over the `ml_model_versions` table.
#[derive(Clone)]
pub struct SqliteMetadataStore {
    pool: SqlitePool,
}

#[async_trait]
impl MetadataStore for SqliteMetadataStore {
    async fn deployed(
        &self,
        model_type: &str,
    ) -> Result<Option<ModelMetadata>, model_registry::StoreError> {
        let row = sqlx::query(
            r#"
            SELECT model_type, model_name, version, model_path, deployed, deployed_at,
                   feature_names, metrics, hyperparameters
            FROM ml_model_versions
            WHERE model_type = ?1 AND deployed = 1
            ORDER BY deployed_at DESC
            LIMIT 1
            "#,
        )
        .bind(model_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| model_registry::StoreError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let feature_names: Vec<String> = row
            .try_get::<Option<String>, _>("feature_names")
            .map_err(|e| model_registry::StoreError::Query(e.to_string()))?
            .map(|text| serde_json::from_str(&text))
            .transpose()
            .map_err(|e| model_registry::StoreError::Query(e.to_string()))?
            .unwrap_or_default();

        let parse_json = |column: &str| -> Result<Option<Value>, model_registry::StoreError> {
            row.try_get::<Option<String>, _>(column)
                .map_err(|e| model_registry::StoreError::Query(e.to_string()))?
                .map(|text| serde_json::from_str(&text))
                .transpose()
                .map_err(|e| model_registry::StoreError::Query(e.to_string()))
        };

        let get = |e: sqlx::Error| model_registry::StoreError::Query(e.to_string());
        Ok(Some(ModelMetadata {
            model_type: row.try_get("model_type").map_err(get)?,
            model_name: row.try_get("model_name").map_err(get)?,
            version: row.try_get("version").map_err(get)?,
            model_path: row.try_get("model_path").map_err(get)?,
            deployed: row.try_get("deployed").map_err(get)?,
            deployed_at: row.try_get("deployed_at").map_err(get)?,
            feature_names,
            metrics: parse_json("metrics")?,
            hyperparameters: parse_json("hyperparameters")?,
        }))
    }
}

/// `FeatureStore` over the `ml_feature_store` table.
#[derive(Clone)]
pub struct SqliteFeatureStore {
    pool: SqlitePool,
}

#[async_trait]
impl FeatureStore for SqliteFeatureStore {
    async fn latest(
        &self,
        subject_id: &str,
        feature_version: &str,
    ) -> Result<Option<FeatureRecord>, feature_resolver::StoreError> {
        let row = sqlx::query(
            r#"
            SELECT subject_id, feature_version, extraction_timestamp, features
            FROM ml_feature_store
            WHERE subject_id = ?1 AND feature_version = ?2
            ORDER BY extraction_timestamp DESC
            LIMIT 1
            "#,
        )
        .bind(subject_id)
        .bind(feature_version)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| feature_resolver::StoreError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let get = |e: sqlx::Error| feature_resolver::StoreError::Query(e.to_string());
        let features_text: String = row.try_get("features").map_err(get)?;
        let features: Map<String, Value> = serde_json::from_str(&features_text)
            .map_err(|e| feature_resolver::StoreError::Query(e.to_string()))?;

        Ok(Some(FeatureRecord {
            subject_id: row.try_get("subject_id").map_err(get)?,
            feature_version: row.try_get("feature_version").map_err(get)?,
            extraction_timestamp: row
                .try_get::<Option<DateTime<Utc>>, _>("extraction_timestamp")
                .map_err(get)?,
            features: FeatureMap::new(features),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    async fn database() -> Database {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn metadata(model_type: &str, version: &str, deployed: bool, at: DateTime<Utc>) -> ModelMetadata {
        ModelMetadata {
            model_type: model_type.to_string(),
            model_name: Some(format!("{model_type}_lr")),
            version: version.to_string(),
            model_path: Some(format!("{model_type}.json")),
            deployed,
            deployed_at: Some(at),
            feature_names: vec!["performance_xp_earning_rate".to_string()],
            metrics: Some(json!({"auc": 0.81})),
            hyperparameters: None,
        }
    }

    #[tokio::test]
    async fn deployed_returns_latest_deployed_row() {
        let db = database().await;
        let now = Utc::now();
        db.record_model_version(&metadata("dropout", "1.0.0", true, now - Duration::days(2)))
            .await
            .unwrap();
        db.record_model_version(&metadata("dropout", "1.1.0", true, now - Duration::days(1)))
            .await
            .unwrap();
        // newest row is not deployed and must be skipped
        db.record_model_version(&metadata("dropout", "1.2.0", false, now))
            .await
            .unwrap();

        let store = db.metadata_store();
        let row = store.deployed("dropout").await.unwrap().unwrap();
        assert_eq!(row.version, "1.1.0");
        assert_eq!(row.feature_names, vec!["performance_xp_earning_rate".to_string()]);
        assert_eq!(row.metrics, Some(json!({"auc": 0.81})));
    }

    #[tokio::test]
    async fn deployed_returns_none_for_unknown_type() {
        let db = database().await;
        let store = db.metadata_store();
        assert!(store.deployed("sentiment").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn latest_feature_record_wins_by_extraction_time() {
        let db = database().await;
        let now = Utc::now();

        let older = FeatureRecord {
            subject_id: "s-1".to_string(),
            feature_version: "1.0.0".to_string(),
            extraction_timestamp: Some(now - Duration::hours(5)),
            features: FeatureMap::new(
                json!({"engagement": {"streak_break_count": 1}})
                    .as_object()
                    .unwrap()
                    .clone(),
            ),
        };
        let newer = FeatureRecord {
            extraction_timestamp: Some(now),
            features: FeatureMap::new(
                json!({"engagement": {"streak_break_count": 4}})
                    .as_object()
                    .unwrap()
                    .clone(),
            ),
            ..older.clone()
        };
        db.record_feature_snapshot(&older).await.unwrap();
        db.record_feature_snapshot(&newer).await.unwrap();

        let store = db.feature_store();
        let record = store.latest("s-1", "1.0.0").await.unwrap().unwrap();
        assert_eq!(record.features.i64_or("engagement", "streak_break_count", 0), 4);
    }

    #[tokio::test]
    async fn feature_version_mismatch_yields_none() {
        let db = database().await;
        let record = FeatureRecord {
            subject_id: "s-1".to_string(),
            feature_version: "1.0.0".to_string(),
            extraction_timestamp: Some(Utc::now()),
            features: FeatureMap::default(),
        };
        db.record_feature_snapshot(&record).await.unwrap();

        let store = db.feature_store();
        assert!(store.latest("s-1", "2.0.0").await.unwrap().is_none());
        assert!(store.latest("s-2", "1.0.0").await.unwrap().is_none());
    }
}
