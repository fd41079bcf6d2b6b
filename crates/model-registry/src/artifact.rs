//! Model Artifact Bundles
//!
//! An artifact is an opaque predictor bundle: a predictor object, an optional
//! input scaler and the ordered feature names it expects. The on-disk format
//! is a JSON bundle of linear model weights; everything downstream goes
//! through the [`Predictor`] trait and never sees the representation.

use crate::ModelMetadata;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Artifact-level failures
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Malformed model artifact: {0}")]
    Malformed(String),
    #[error("Input dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Model does not expose class probabilities")]
    NoProbabilities,
}

/// Minimal prediction capability an artifact exposes.
pub trait Predictor: Send + Sync {
    /// Whether [`Predictor::predict_proba`] is meaningful for this model.
    fn is_classifier(&self) -> bool;

    /// Point prediction: class index for classifiers, raw value for regressors.
    fn predict(&self, vector: &[f64]) -> Result<f64, ArtifactError>;

    /// Class probability distribution. Fails for regression models.
    fn predict_proba(&self, vector: &[f64]) -> Result<Vec<f64>, ArtifactError>;
}

/// Linear model weights as serialized by the training pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinearModel {
    /// Binary logistic classifier.
    Classifier { coefficients: Vec<f64>, intercept: f64 },
    /// Linear regressor.
    Regressor { coefficients: Vec<f64>, intercept: f64 },
}

impl LinearModel {
    fn decision(&self, vector: &[f64]) -> Result<f64, ArtifactError> {
        let (coefficients, intercept) = match self {
            LinearModel::Classifier { coefficients, intercept }
            | LinearModel::Regressor { coefficients, intercept } => (coefficients, *intercept),
        };
        if coefficients.len() != vector.len() {
            return Err(ArtifactError::DimensionMismatch {
                expected: coefficients.len(),
                actual: vector.len(),
            });
        }
        let dot: f64 = coefficients.iter().zip(vector).map(|(c, x)| c * x).sum();
        Ok(dot + intercept)
    }
}

impl Predictor for LinearModel {
    fn is_classifier(&self) -> bool {
        matches!(self, LinearModel::Classifier { .. })
    }

    fn predict(&self, vector: &[f64]) -> Result<f64, ArtifactError> {
        let decision = self.decision(vector)?;
        match self {
            LinearModel::Classifier { .. } => Ok(if decision >= 0.0 { 1.0 } else { 0.0 }),
            LinearModel::Regressor { .. } => Ok(decision),
        }
    }

    fn predict_proba(&self, vector: &[f64]) -> Result<Vec<f64>, ArtifactError> {
        match self {
            LinearModel::Classifier { .. } => {
                let decision = self.decision(vector)?;
                let positive = 1.0 / (1.0 + (-decision).exp());
                Ok(vec![1.0 - positive, positive])
            }
            LinearModel::Regressor { .. } => Err(ArtifactError::NoProbabilities),
        }
    }
}

/// Standard scaler parameters applied to the input vector before prediction.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn transform(&self, vector: &[f64]) -> Result<Vec<f64>, ArtifactError> {
        if self.mean.len() != vector.len() || self.scale.len() != vector.len() {
            return Err(ArtifactError::DimensionMismatch {
                expected: self.mean.len(),
                actual: vector.len(),
            });
        }
        Ok(vector
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| if *scale == 0.0 { 0.0 } else { (x - mean) / scale })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct RawBundle {
    #[serde(default)]
    model: Option<LinearModel>,
    #[serde(default)]
    scaler: Option<StandardScaler>,
    #[serde(default)]
    feature_names: Vec<String>,
}

/// A loaded artifact pinned to the version it was deployed under.
///
/// Owned by the registry, handed out as an `Arc` snapshot: once a caller
/// holds one, cache invalidation cannot pull it out from underneath.
pub struct CachedArtifact {
    pub model_type: String,
    pub version: String,
    predictor: Option<Box<dyn Predictor>>,
    scaler: Option<StandardScaler>,
    feature_names: Vec<String>,
    pub metadata: ModelMetadata,
    pub loaded_at: DateTime<Utc>,
}

impl CachedArtifact {
    /// Parse a JSON bundle into a cache entry.
    pub fn from_bundle_bytes(
        bytes: &[u8],
        metadata: ModelMetadata,
        loaded_at: DateTime<Utc>,
    ) -> Result<Self, ArtifactError> {
        let raw: RawBundle =
            serde_json::from_slice(bytes).map_err(|e| ArtifactError::Malformed(e.to_string()))?;

        // Bundle-declared names win; fall back to the metadata row's ordering.
        let feature_names = if raw.feature_names.is_empty() {
            metadata.feature_names.clone()
        } else {
            raw.feature_names
        };

        Ok(Self {
            model_type: metadata.model_type.clone(),
            version: metadata.version.clone(),
            predictor: raw.model.map(|m| Box::new(m) as Box<dyn Predictor>),
            scaler: raw.scaler,
            feature_names,
            metadata,
            loaded_at,
        })
    }

    /// The predictor object, absent when the bundle held no model.
    pub fn predictor(&self) -> Option<&dyn Predictor> {
        self.predictor.as_deref()
    }

    /// Declared feature ordering; `None` when the artifact declares none.
    pub fn feature_names(&self) -> Option<&[String]> {
        if self.feature_names.is_empty() {
            None
        } else {
            Some(&self.feature_names)
        }
    }

    /// Apply the bundled input scaler, if any.
    pub fn transform(&self, vector: Vec<f64>) -> Result<Vec<f64>, ArtifactError> {
        match &self.scaler {
            Some(scaler) => scaler.transform(&vector),
            None => Ok(vector),
        }
    }
}

impl std::fmt::Debug for CachedArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedArtifact")
            .field("model_type", &self.model_type)
            .field("version", &self.version)
            .field("has_predictor", &self.predictor.is_some())
            .field("has_scaler", &self.scaler.is_some())
            .field("feature_names", &self.feature_names.len())
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> ModelMetadata {
        ModelMetadata {
            model_type: "dropout".to_string(),
            model_name: Some("dropout_lr".to_string()),
            version: "1.2.0".to_string(),
            model_path: Some("dropout.json".to_string()),
            deployed: true,
            deployed_at: None,
            feature_names: vec!["a".to_string(), "b".to_string()],
            metrics: None,
            hyperparameters: None,
        }
    }

    #[test]
    fn classifier_probabilities_sum_to_one() {
        let model = LinearModel::Classifier {
            coefficients: vec![1.0, -2.0],
            intercept: 0.5,
        };
        let proba = model.predict_proba(&[0.3, 0.1]).unwrap();
        assert_eq!(proba.len(), 2);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
        assert!(proba[1] > 0.0 && proba[1] < 1.0);
    }

    #[test]
    fn regressor_predicts_raw_value() {
        let model = LinearModel::Regressor {
            coefficients: vec![2.0, 0.5],
            intercept: 1.0,
        };
        assert_eq!(model.predict(&[1.0, 2.0]).unwrap(), 4.0);
        assert!(matches!(
            model.predict_proba(&[1.0, 2.0]),
            Err(ArtifactError::NoProbabilities)
        ));
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let model = LinearModel::Classifier {
            coefficients: vec![1.0, 2.0, 3.0],
            intercept: 0.0,
        };
        assert!(matches!(
            model.predict(&[1.0]),
            Err(ArtifactError::DimensionMismatch { expected: 3, actual: 1 })
        ));
    }

    #[test]
    fn scaler_standardizes_and_guards_zero_scale() {
        let scaler = StandardScaler {
            mean: vec![10.0, 5.0],
            scale: vec![2.0, 0.0],
        };
        assert_eq!(scaler.transform(&[14.0, 5.0]).unwrap(), vec![2.0, 0.0]);
    }

    #[test]
    fn bundle_parses_with_metadata_feature_name_fallback() {
        let bytes = br#"{"model": {"kind": "classifier", "coefficients": [0.1, 0.2], "intercept": 0.0}}"#;
        let artifact =
            CachedArtifact::from_bundle_bytes(bytes, metadata(), Utc::now()).unwrap();
        assert!(artifact.predictor().is_some());
        assert_eq!(artifact.feature_names().unwrap(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn empty_bundle_exposes_no_capabilities() {
        let mut meta = metadata();
        meta.feature_names.clear();
        let artifact = CachedArtifact::from_bundle_bytes(b"{}", meta, Utc::now()).unwrap();
        assert!(artifact.predictor().is_none());
        assert!(artifact.feature_names().is_none());
    }

    #[test]
    fn malformed_json_is_classified() {
        assert!(matches!(
            CachedArtifact::from_bundle_bytes(b"not json", metadata(), Utc::now()),
            Err(ArtifactError::Malformed(_))
        ));
    }
}
