//! Dropout Risk Heuristics

use crate::signals::DropoutSignals;
use crate::RiskAssessment;
use feature_resolver::FeatureMap;

/// Score dropout risk from engagement, performance and behavioral signals.
///
/// Independent rule deltas accumulate into an unbounded score that is then
/// clamped to [5, 100]. Every fired rule contributes one factor string.
pub fn score_dropout(features: &FeatureMap) -> RiskAssessment {
    // No telemetry at all: report the floor rather than scoring defaults.
    if features.is_empty() {
        return RiskAssessment::compose(0.0, Vec::new(), Vec::new());
    }

    let signals = DropoutSignals::from_features(features);

    let mut score = 0.0;
    let mut factors = Vec::new();

    if signals.checkin_completion_rate_7d < 0.5 {
        score += (0.5 - signals.checkin_completion_rate_7d) * 80.0;
        factors.push("Low daily check-in completion".to_string());
    }

    if signals.streak_break_count >= 3 {
        score += (signals.streak_break_count as f64 * 6.0).min(24.0);
        factors.push("Frequent learning streak breaks".to_string());
    }

    if signals.chat_session_count_30d < 2 {
        score += 8.0;
        factors.push("Minimal mentor/chat engagement".to_string());
    }

    if signals.ark_progress_rate_30d <= 0.0 {
        score += 18.0;
        factors.push("ARK progress trending downward".to_string());
    }

    if signals.xp_earning_rate < 15.0 {
        score += 10.0;
        factors.push("Low XP accumulation".to_string());
    }

    if signals.progress_decline_days_30d > 5 {
        score += ((signals.progress_decline_days_30d - 5) as f64 * 3.0).min(18.0);
        factors.push("Multiple consecutive underperformance days".to_string());
    }

    if signals.behavioral_change_score > 0.4 {
        score += 12.0;
        factors.push("Interventions suggest inconsistent behaviour".to_string());
    }

    let mut recommendations = Vec::new();
    let level = crate::RiskLevel::from_score(score.max(5.0).min(100.0));
    if level.is_elevated() {
        recommendations.push("Schedule mentor intervention within 48 hours".to_string());
        recommendations.push("Create a simplified two-week recovery plan".to_string());
    }
    if signals.checkin_completion_rate_7d < 0.6 {
        recommendations.push("Enable check-in reminders and celebrate streak milestones".to_string());
    }
    if signals.ark_progress_rate_30d <= 0.0 {
        recommendations.push("Review ARK milestones and adjust scope".to_string());
    }

    RiskAssessment::compose(score, factors, recommendations)
}
