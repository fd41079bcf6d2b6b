//! Burnout Risk Heuristics

use crate::signals::BurnoutSignals;
use crate::RiskAssessment;
use feature_resolver::FeatureMap;

/// Score burnout risk from emotional and engagement signals.
pub fn score_burnout(features: &FeatureMap) -> RiskAssessment {
    // No telemetry at all: report the floor rather than scoring defaults.
    if features.is_empty() {
        return RiskAssessment::compose(0.0, Vec::new(), Vec::new());
    }

    let signals = BurnoutSignals::from_features(features);

    let mut score = 0.0;
    let mut factors = Vec::new();

    if signals.avg_emotion_score_7d <= 4.0 {
        score += (4.0 - signals.avg_emotion_score_7d) * 10.0;
        factors.push("Self-reported mood trending low".to_string());
    }

    if signals.avg_energy_level_7d <= 4.0 {
        score += (4.0 - signals.avg_energy_level_7d) * 9.0;
        factors.push("Low energy in recent check-ins".to_string());
    }

    if signals.stress_days_count_30d >= 10 {
        score += ((signals.stress_days_count_30d - 9) as f64 * 2.5).min(25.0);
        factors.push("Frequent high-stress check-ins".to_string());
    }

    if signals.emotion_trend < -0.2 {
        score += signals.emotion_trend.abs() * 30.0;
        factors.push("Emotion trend declining week-over-week".to_string());
    }

    if signals.low_energy_days_count_30d >= 7 {
        score += ((signals.low_energy_days_count_30d - 6) as f64 * 2.0).min(18.0);
        factors.push("Many low-energy days recorded".to_string());
    }

    if signals.chat_session_count_30d == 0 {
        score += 6.0;
        factors.push("No supportive conversations logged".to_string());
    }

    let mut recommendations = Vec::new();
    let level = crate::RiskLevel::from_score(score.max(5.0).min(100.0));
    if level.is_elevated() {
        recommendations.push("Assign wellbeing mentor check-in".to_string());
        recommendations.push("Share guided relaxation or mindfulness session".to_string());
    }
    if signals.stress_days_count_30d >= 10 {
        recommendations.push("Review workload and redistribute ARK milestones".to_string());
    }

    RiskAssessment::compose(score, factors, recommendations)
}
