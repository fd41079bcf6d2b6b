//! Prediction Response Types

use chrono::{DateTime, Utc};
use fallback::{DifficultyLevel, RiskLevel};
use feature_resolver::FeatureRecord;
use model_registry::ModelMetadata;
use serde::Serialize;

/// Provenance attached to every prediction.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionMetadata {
    pub model_name: Option<String>,
    pub model_version: Option<String>,
    pub feature_version: String,
    pub feature_timestamp: Option<DateTime<Utc>>,
    pub used_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl PredictionMetadata {
    /// Metadata for the rule-based baseline of a given model type.
    pub(crate) fn baseline(model_type: &str, record: &FeatureRecord) -> Self {
        Self {
            model_name: Some(format!("rule_based_{model_type}")),
            model_version: Some("fallback".to_string()),
            feature_version: record.feature_version.clone(),
            feature_timestamp: record.extraction_timestamp,
            used_fallback: true,
            fallback_reason: Some("Rule-based baseline".to_string()),
        }
    }

    /// Metadata for a successful model-path prediction.
    pub(crate) fn from_model(metadata: &ModelMetadata, record: &FeatureRecord) -> Self {
        Self {
            model_name: metadata.model_name.clone(),
            model_version: Some(metadata.version.clone()),
            feature_version: record.feature_version.clone(),
            feature_timestamp: record.extraction_timestamp,
            used_fallback: false,
            fallback_reason: None,
        }
    }
}

/// Risk prediction for one model type (dropout or burnout).
#[derive(Debug, Clone, Serialize)]
pub struct RiskPrediction {
    /// Composite score in [0, 100], rounded to 2 decimals.
    pub score: f64,
    pub level: RiskLevel,
    /// `score / 100`, rounded to 3 decimals independently of `score`.
    pub probability: f64,
    pub factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub metadata: PredictionMetadata,
}

/// Combined risk response for a subject.
#[derive(Debug, Clone, Serialize)]
pub struct RiskResponse {
    pub dropout: RiskPrediction,
    pub burnout: RiskPrediction,
    /// Arithmetic mean of the dropout and burnout scores, 2 decimals.
    pub disengagement_score: f64,
    pub generated_at: DateTime<Utc>,
}

/// Difficulty recommendation for a subject.
#[derive(Debug, Clone, Serialize)]
pub struct DifficultyPrediction {
    /// Normalized score in [0.5, 5.0], rounded to 2 decimals.
    pub difficulty_score: f64,
    pub recommended_level: DifficultyLevel,
    /// Confidence in [0.4, 0.95], rounded to 3 decimals.
    pub confidence: f64,
    pub recommendations: Vec<String>,
    pub metadata: PredictionMetadata,
}
