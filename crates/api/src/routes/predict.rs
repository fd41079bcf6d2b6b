//! Prediction Routes

use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{ApiError, AppState};
use predictor::{DifficultyPrediction, RiskResponse};

/// Body for both prediction endpoints.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub subject_id: String,
    /// Feature schema version; defaults to the configured one.
    pub feature_version: Option<String>,
    /// Skip the model path entirely and answer from the rules.
    #[serde(default)]
    pub force_fallback: bool,
}

/// Dropout + burnout risk with the combined disengagement score.
pub async fn predict_risk(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<RiskResponse>, ApiError> {
    let response = state
        .orchestrator
        .predict_risk(
            &request.subject_id,
            request.feature_version.as_deref(),
            request.force_fallback,
        )
        .await?;
    Ok(Json(response))
}

/// Difficulty recommendation.
pub async fn predict_difficulty(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<DifficultyPrediction>, ApiError> {
    let prediction = state
        .orchestrator
        .predict_difficulty(
            &request.subject_id,
            request.feature_version.as_deref(),
            request.force_fallback,
        )
        .await?;
    Ok(Json(prediction))
}
