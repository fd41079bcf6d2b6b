//! Feature Record and Typed Map Access

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Latest extracted feature snapshot for a subject.
///
/// Produced by the feature store collaborator; immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub subject_id: String,
    pub feature_version: String,
    pub extraction_timestamp: Option<DateTime<Utc>>,
    pub features: FeatureMap,
}

/// Nested feature map keyed category-first, e.g. `engagement.checkin_completion_rate_7d`.
///
/// Wraps the raw JSON so missing or non-numeric leaves resolve through a
/// single accessor instead of scattered lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureMap(pub Map<String, Value>);

impl FeatureMap {
    pub fn new(inner: Map<String, Value>) -> Self {
        Self(inner)
    }

    /// Raw leaf lookup under `category` -> `name`.
    pub fn leaf(&self, category: &str, name: &str) -> Option<&Value> {
        self.0.get(category)?.as_object()?.get(name)
    }

    /// Numeric leaf with an explicit default for absent or non-numeric values.
    pub fn f64_or(&self, category: &str, name: &str, default: f64) -> f64 {
        self.leaf(category, name)
            .and_then(Value::as_f64)
            .unwrap_or(default)
    }

    /// Integer leaf with an explicit default. Accepts JSON floats with an
    /// integral interpretation since upstream extraction stores counts both ways.
    pub fn i64_or(&self, category: &str, name: &str, default: i64) -> i64 {
        self.leaf(category, name)
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
            .unwrap_or(default)
    }

    pub fn inner(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for FeatureMap {
    fn from(inner: Map<String, Value>) -> Self {
        Self(inner)
    }
}
