//! Difficulty Recommendation Heuristics

use crate::signals::DifficultySignals;
use crate::{clamp, round_probability, round_score, DifficultyLevel};
use feature_resolver::FeatureMap;
use serde::Serialize;

/// Rule-based difficulty verdict.
#[derive(Debug, Clone, Serialize)]
pub struct DifficultyAssessment {
    /// Normalized score, clamped to [0.5, 5.0] and rounded to 2 decimals.
    pub difficulty_score: f64,
    pub recommended_level: DifficultyLevel,
    /// Confidence in the recommendation, clamped to [0.4, 0.95].
    pub confidence: f64,
    pub recommendations: Vec<String>,
}

/// Recommend a plan difficulty from aptitude and workload signals.
pub fn score_difficulty(features: &FeatureMap) -> DifficultyAssessment {
    let signals = DifficultySignals::from_features(features);

    let aptitude = signals.ark_progress_rate_30d * 2.0
        + signals.xp_earning_rate / 10.0
        + signals.motivation_level * 3.0
        + signals.confidence_level * 2.0;
    let workload = signals.hours_per_week * 1.5;
    let normalized = clamp((aptitude + workload) / 10.0, 0.5, 5.0);

    let recommended_level = DifficultyLevel::from_score(normalized);
    let recommendation = match recommended_level {
        DifficultyLevel::Ambitious => "Introduce stretch goals and peer challenges",
        DifficultyLevel::Standard => "Maintain current ARK cadence",
        DifficultyLevel::Foundational => "Break milestones into smaller weekly targets",
    };

    let confidence = clamp(0.55 + signals.motivation_level.min(10.0) / 25.0, 0.4, 0.95);

    DifficultyAssessment {
        difficulty_score: round_score(normalized),
        recommended_level,
        confidence: round_probability(confidence),
        recommendations: vec![recommendation.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn features(value: Value) -> FeatureMap {
        match value {
            Value::Object(map) => FeatureMap::new(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn high_aptitude_clamps_to_ambitious() {
        let map = features(json!({
            "performance": { "ark_progress_rate_30d": 5.0, "xp_earning_rate": 100.0 },
            "profile": {
                "motivation_level": 10.0,
                "confidence_level": 10.0,
                "hours_per_week": 40.0
            }
        }));
        let assessment = score_difficulty(&map);
        assert_eq!(assessment.difficulty_score, 5.0);
        assert_eq!(assessment.recommended_level, DifficultyLevel::Ambitious);
        assert_eq!(assessment.confidence, 0.95);
        assert_eq!(
            assessment.recommendations,
            vec!["Introduce stretch goals and peer challenges".to_string()]
        );
    }

    #[test]
    fn defaults_land_in_ambitious() {
        // aptitude = 7*3 + 6*2 = 33, workload = 8*1.5 = 12, (33+12)/10 = 4.5
        let assessment = score_difficulty(&FeatureMap::default());
        assert_eq!(assessment.difficulty_score, 4.5);
        assert_eq!(assessment.recommended_level, DifficultyLevel::Ambitious);
        assert_eq!(assessment.confidence, 0.83);
    }

    #[test]
    fn low_signals_recommend_foundational() {
        let map = features(json!({
            "performance": { "ark_progress_rate_30d": -1.0, "xp_earning_rate": 0.0 },
            "profile": {
                "motivation_level": 2.0,
                "confidence_level": 2.0,
                "hours_per_week": 2.0
            }
        }));
        let assessment = score_difficulty(&map);
        // aptitude = -2 + 0 + 6 + 4 = 8, workload = 3 -> 1.1
        assert_eq!(assessment.difficulty_score, 1.1);
        assert_eq!(assessment.recommended_level, DifficultyLevel::Foundational);
        assert_eq!(
            assessment.recommendations,
            vec!["Break milestones into smaller weekly targets".to_string()]
        );
    }

    proptest! {
        #[test]
        fn score_and_confidence_within_bounds(
            progress in -100.0f64..100.0,
            xp in -1000.0f64..1000.0,
            motivation in -20.0f64..20.0,
            confidence in -20.0f64..20.0,
            hours in 0.0f64..168.0,
        ) {
            let map = features(json!({
                "performance": { "ark_progress_rate_30d": progress, "xp_earning_rate": xp },
                "profile": {
                    "motivation_level": motivation,
                    "confidence_level": confidence,
                    "hours_per_week": hours
                }
            }));
            let assessment = score_difficulty(&map);
            prop_assert!(assessment.difficulty_score >= 0.5);
            prop_assert!(assessment.difficulty_score <= 5.0);
            prop_assert!(assessment.confidence >= 0.4);
            prop_assert!(assessment.confidence <= 0.95);
        }
    }
}
