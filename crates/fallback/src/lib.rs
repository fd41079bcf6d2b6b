//! Rule-Based Scoring Baseline
//!
//! Deterministic heuristics over a subject's feature map. These supply the
//! score when no model is deployed or inference fails, and the interpretable
//! factors/recommendations on every path.

mod burnout;
mod difficulty;
mod dropout;
mod level;
mod signals;

pub use burnout::score_burnout;
pub use difficulty::{score_difficulty, DifficultyAssessment};
pub use dropout::score_dropout;
pub use level::{DifficultyLevel, RiskLevel};
pub use signals::{BurnoutSignals, DifficultySignals, DropoutSignals};

use serde::Serialize;

/// Factor string reported when no rule fired.
pub const LIMITED_TELEMETRY: &str = "Limited telemetry available";

/// Rule-based risk verdict for one model type.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    /// Composite score, clamped to [5, 100] and rounded to 2 decimals.
    pub score: f64,
    pub level: RiskLevel,
    /// `score / 100`, rounded to 3 decimals independently of `score`.
    pub probability: f64,
    pub factors: Vec<String>,
    pub recommendations: Vec<String>,
}

impl RiskAssessment {
    pub(crate) fn compose(raw_score: f64, factors: Vec<String>, recommendations: Vec<String>) -> Self {
        let score = clamp(raw_score, 5.0, 100.0);
        let factors = if factors.is_empty() {
            vec![LIMITED_TELEMETRY.to_string()]
        } else {
            factors
        };
        Self {
            score: round_score(score),
            level: RiskLevel::from_score(score),
            probability: round_probability(score / 100.0),
            factors,
            recommendations,
        }
    }
}

pub(crate) fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Round a score to 2 decimal places.
pub fn round_score(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round a probability or confidence to 3 decimal places.
pub fn round_probability(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assessment_clamps_and_rounds() {
        let assessment = RiskAssessment::compose(134.276, vec!["x".into()], vec![]);
        assert_eq!(assessment.score, 100.0);
        assert_eq!(assessment.probability, 1.0);
        assert_eq!(assessment.level, RiskLevel::Critical);
    }

    #[test]
    fn assessment_floors_at_five() {
        let assessment = RiskAssessment::compose(0.0, vec![], vec![]);
        assert_eq!(assessment.score, 5.0);
        assert_eq!(assessment.level, RiskLevel::Low);
        assert_eq!(assessment.factors, vec![LIMITED_TELEMETRY.to_string()]);
    }

    #[test]
    fn probability_rounds_independently_of_score() {
        // score rounds to 2dp, probability to 3dp of the clamped (unrounded) score
        let assessment = RiskAssessment::compose(47.5678, vec!["x".into()], vec![]);
        assert_eq!(assessment.score, 47.57);
        assert_eq!(assessment.probability, 0.476);
    }
}
