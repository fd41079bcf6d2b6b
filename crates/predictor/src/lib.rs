//! Prediction Orchestration
//!
//! Combines the model path (registry + artifact inference) with the
//! rule-based baseline. The baseline always runs first; any classified model
//! failure is recorded as a fallback reason and the request still succeeds.

mod orchestrator;
mod types;

pub use orchestrator::PredictionOrchestrator;
pub use types::{DifficultyPrediction, PredictionMetadata, RiskPrediction, RiskResponse};

use thiserror::Error;

/// Request-fatal prediction errors.
///
/// Model-path failures never appear here; they are recovered inside the
/// orchestrator and surfaced only as `fallback_reason` metadata.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Feature vector not found for subject")]
    FeatureNotFound,
    #[error("Feature store error: {0}")]
    Store(#[from] feature_resolver::StoreError),
}
