//! Prediction Orchestrator

use crate::{
    DifficultyPrediction, PredictError, PredictionMetadata, RiskPrediction, RiskResponse,
};
use chrono::Utc;
use fallback::{
    round_probability, round_score, score_burnout, score_difficulty, score_dropout,
    DifficultyLevel, RiskAssessment, RiskLevel,
};
use feature_resolver::{
    flatten_features, vectorize_features, FeatureMap, FeatureRecord, FeatureResolver,
};
use metrics::counter;
use model_registry::{CachedArtifact, ModelRegistry, RegistryError};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
enum RiskKind {
    Dropout,
    Burnout,
}

impl RiskKind {
    fn model_type(self) -> &'static str {
        match self {
            RiskKind::Dropout => "dropout",
            RiskKind::Burnout => "burnout",
        }
    }

    fn baseline(self, features: &FeatureMap) -> RiskAssessment {
        match self {
            RiskKind::Dropout => score_dropout(features),
            RiskKind::Burnout => score_burnout(features),
        }
    }
}

/// Numeric output of the model path before composition.
enum ModelOutput {
    /// Positive-class probability from a classification artifact.
    Probability(f64),
    /// Raw predicted value from a regression artifact.
    Value(f64),
}

enum ModelPathError {
    Registry(RegistryError),
    Inference(String),
}

impl ModelPathError {
    /// Map a model-path failure to the fallback reason recorded in metadata.
    /// Expected registry conditions surface verbatim; everything else is an
    /// inference failure.
    fn into_reason(self) -> String {
        match self {
            ModelPathError::Registry(err) if err.is_expected() => err.to_string(),
            ModelPathError::Registry(err) => format!("Model inference failed: {err}"),
            ModelPathError::Inference(message) => format!("Model inference failed: {message}"),
        }
    }
}

impl From<RegistryError> for ModelPathError {
    fn from(err: RegistryError) -> Self {
        ModelPathError::Registry(err)
    }
}

/// Orchestrates feature resolution, the model path and rule-based fallback.
pub struct PredictionOrchestrator {
    resolver: FeatureResolver,
    registry: Arc<ModelRegistry>,
}

impl PredictionOrchestrator {
    pub fn new(resolver: FeatureResolver, registry: Arc<ModelRegistry>) -> Self {
        Self { resolver, registry }
    }

    /// Dropout and burnout risk for a subject, plus the combined
    /// disengagement score.
    pub async fn predict_risk(
        &self,
        subject_id: &str,
        feature_version: Option<&str>,
        force_fallback: bool,
    ) -> Result<RiskResponse, PredictError> {
        let record = self.resolve(subject_id, feature_version).await?;

        let dropout = self.risk(RiskKind::Dropout, &record, force_fallback).await;
        let burnout = self.risk(RiskKind::Burnout, &record, force_fallback).await;
        let disengagement_score = round_score((dropout.score + burnout.score) / 2.0);

        Ok(RiskResponse {
            dropout,
            burnout,
            disengagement_score,
            generated_at: Utc::now(),
        })
    }

    /// Difficulty recommendation for a subject.
    pub async fn predict_difficulty(
        &self,
        subject_id: &str,
        feature_version: Option<&str>,
        force_fallback: bool,
    ) -> Result<DifficultyPrediction, PredictError> {
        let record = self.resolve(subject_id, feature_version).await?;

        let baseline = score_difficulty(&record.features);
        let mut score = baseline.difficulty_score;
        let mut recommended_level = baseline.recommended_level;
        let mut confidence = baseline.confidence;
        let mut metadata = PredictionMetadata::baseline("difficulty", &record);

        if !force_fallback {
            match self.run_model("difficulty", &record.features).await {
                Ok((ModelOutput::Value(value), artifact)) => {
                    // Model path re-derives level and confidence from its own
                    // score; the fallback path keeps the rule-derived pair.
                    score = value.clamp(0.5, 5.0);
                    recommended_level = DifficultyLevel::from_score(score);
                    confidence = model_confidence(score);
                    metadata = PredictionMetadata::from_model(&artifact.metadata, &record);
                    debug!(score, "difficulty model path succeeded");
                }
                Ok((ModelOutput::Probability(_), _)) => {
                    self.record_fallback(
                        "difficulty",
                        &mut metadata,
                        ModelPathError::Inference(
                            "difficulty artifact produced no regression value".to_string(),
                        ),
                    );
                }
                Err(err) => self.record_fallback("difficulty", &mut metadata, err),
            }
        }
        counter!("predictions_total", "model_type" => "difficulty").increment(1);

        Ok(DifficultyPrediction {
            difficulty_score: round_score(score),
            recommended_level,
            confidence: round_probability(confidence),
            recommendations: baseline.recommendations,
            metadata,
        })
    }

    async fn resolve(
        &self,
        subject_id: &str,
        feature_version: Option<&str>,
    ) -> Result<FeatureRecord, PredictError> {
        self.resolver
            .resolve(subject_id, feature_version)
            .await?
            .ok_or(PredictError::FeatureNotFound)
    }

    async fn risk(
        &self,
        kind: RiskKind,
        record: &FeatureRecord,
        force_fallback: bool,
    ) -> RiskPrediction {
        // The baseline always runs: it is cheap and supplies the
        // factors/recommendations even when the model score wins.
        let baseline = kind.baseline(&record.features);
        let mut score = baseline.score;
        let mut metadata = PredictionMetadata::baseline(kind.model_type(), record);

        if !force_fallback {
            match self.run_model(kind.model_type(), &record.features).await {
                Ok((output, artifact)) => {
                    score = match output {
                        ModelOutput::Probability(probability) => probability * 100.0,
                        ModelOutput::Value(value) => value,
                    };
                    metadata = PredictionMetadata::from_model(&artifact.metadata, record);
                    debug!(model_type = kind.model_type(), score, "model path succeeded");
                }
                Err(err) => self.record_fallback(kind.model_type(), &mut metadata, err),
            }
        }
        counter!("predictions_total", "model_type" => kind.model_type()).increment(1);

        compose_risk(score, &baseline, metadata)
    }

    /// Fetch the artifact and run inference over the flattened feature map.
    async fn run_model(
        &self,
        model_type: &str,
        features: &FeatureMap,
    ) -> Result<(ModelOutput, Arc<CachedArtifact>), ModelPathError> {
        let artifact = self.registry.get_artifact(model_type).await?;

        let feature_names = artifact.feature_names().ok_or_else(|| {
            ModelPathError::Inference(format!("Missing feature names for model '{model_type}'"))
        })?;
        let predictor = artifact.predictor().ok_or_else(|| {
            ModelPathError::Inference(format!("Model object missing for '{model_type}'"))
        })?;

        let flat = flatten_features(features.inner());
        let vector = vectorize_features(&flat, feature_names);
        let vector = artifact
            .transform(vector)
            .map_err(|e| ModelPathError::Inference(e.to_string()))?;

        let output = if predictor.is_classifier() {
            let probabilities = predictor
                .predict_proba(&vector)
                .map_err(|e| ModelPathError::Inference(e.to_string()))?;
            let positive = probabilities.get(1).copied().ok_or_else(|| {
                ModelPathError::Inference(format!(
                    "classifier for '{model_type}' returned no positive-class probability"
                ))
            })?;
            ModelOutput::Probability(positive)
        } else {
            let value = predictor
                .predict(&vector)
                .map_err(|e| ModelPathError::Inference(e.to_string()))?;
            ModelOutput::Value(value)
        };

        Ok((output, artifact))
    }

    fn record_fallback(
        &self,
        model_type: &str,
        metadata: &mut PredictionMetadata,
        err: ModelPathError,
    ) {
        let reason = err.into_reason();
        warn!(
            model_type,
            reason = %reason,
            "model path unavailable, keeping rule-based score"
        );
        counter!("prediction_fallbacks_total", "model_type" => model_type.to_string())
            .increment(1);
        metadata.fallback_reason = Some(reason);
    }
}

/// Compose the final risk prediction from whichever score won.
///
/// Level derives from the score through the fixed thresholds and the
/// factors/recommendations always come from the rule payload, so a model
/// score stays interpretable.
fn compose_risk(
    score: f64,
    baseline: &RiskAssessment,
    metadata: PredictionMetadata,
) -> RiskPrediction {
    let score = score.clamp(0.0, 100.0);
    RiskPrediction {
        score: round_score(score),
        level: RiskLevel::from_score(score),
        probability: round_probability(score / 100.0),
        factors: baseline.factors.clone(),
        recommendations: baseline.recommendations.clone(),
        metadata,
    }
}

/// Confidence for a model-derived difficulty score: linear over
/// [0.5, 5.0] -> [0.45, 0.9], clamped to [0.4, 0.95].
fn model_confidence(score: f64) -> f64 {
    let t = (score - 0.5) / 4.5;
    (0.45 + t * 0.45).clamp(0.4, 0.95)
}
