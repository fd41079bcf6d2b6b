//! Typed Signal Extraction
//!
//! Each scoring function reads a fixed set of leaves from the nested feature
//! map. The structs below are the single source of truth for those leaf names
//! and their defaults when telemetry is missing.

use feature_resolver::FeatureMap;

/// Signals feeding the dropout heuristics.
#[derive(Debug, Clone, PartialEq)]
pub struct DropoutSignals {
    pub checkin_completion_rate_7d: f64,
    pub streak_break_count: i64,
    pub chat_session_count_30d: i64,
    pub ark_progress_rate_30d: f64,
    pub xp_earning_rate: f64,
    pub progress_decline_days_30d: i64,
    pub behavioral_change_score: f64,
}

impl Default for DropoutSignals {
    fn default() -> Self {
        Self {
            checkin_completion_rate_7d: 0.0,
            streak_break_count: 0,
            chat_session_count_30d: 0,
            ark_progress_rate_30d: 0.0,
            xp_earning_rate: 0.0,
            progress_decline_days_30d: 0,
            behavioral_change_score: 0.0,
        }
    }
}

impl DropoutSignals {
    pub fn from_features(features: &FeatureMap) -> Self {
        let defaults = Self::default();
        Self {
            checkin_completion_rate_7d: features.f64_or(
                "engagement",
                "checkin_completion_rate_7d",
                defaults.checkin_completion_rate_7d,
            ),
            streak_break_count: features.i64_or(
                "engagement",
                "streak_break_count",
                defaults.streak_break_count,
            ),
            chat_session_count_30d: features.i64_or(
                "engagement",
                "chat_session_count_30d",
                defaults.chat_session_count_30d,
            ),
            ark_progress_rate_30d: features.f64_or(
                "performance",
                "ark_progress_rate_30d",
                defaults.ark_progress_rate_30d,
            ),
            xp_earning_rate: features.f64_or(
                "performance",
                "xp_earning_rate",
                defaults.xp_earning_rate,
            ),
            progress_decline_days_30d: features.i64_or(
                "performance",
                "progress_decline_days_30d",
                defaults.progress_decline_days_30d,
            ),
            behavioral_change_score: features.f64_or(
                "behavioral",
                "behavioral_change_score",
                defaults.behavioral_change_score,
            ),
        }
    }
}

/// Signals feeding the burnout heuristics.
#[derive(Debug, Clone, PartialEq)]
pub struct BurnoutSignals {
    pub avg_emotion_score_7d: f64,
    pub avg_energy_level_7d: f64,
    pub stress_days_count_30d: i64,
    pub emotion_trend: f64,
    pub low_energy_days_count_30d: i64,
    pub chat_session_count_30d: i64,
}

impl Default for BurnoutSignals {
    fn default() -> Self {
        Self {
            avg_emotion_score_7d: 6.0,
            avg_energy_level_7d: 6.0,
            stress_days_count_30d: 0,
            emotion_trend: 0.0,
            low_energy_days_count_30d: 0,
            chat_session_count_30d: 0,
        }
    }
}

impl BurnoutSignals {
    pub fn from_features(features: &FeatureMap) -> Self {
        let defaults = Self::default();
        Self {
            avg_emotion_score_7d: features.f64_or(
                "emotional",
                "avg_emotion_score_7d",
                defaults.avg_emotion_score_7d,
            ),
            avg_energy_level_7d: features.f64_or(
                "emotional",
                "avg_energy_level_7d",
                defaults.avg_energy_level_7d,
            ),
            stress_days_count_30d: features.i64_or(
                "emotional",
                "stress_days_count_30d",
                defaults.stress_days_count_30d,
            ),
            emotion_trend: features.f64_or("emotional", "emotion_trend", defaults.emotion_trend),
            low_energy_days_count_30d: features.i64_or(
                "emotional",
                "low_energy_days_count_30d",
                defaults.low_energy_days_count_30d,
            ),
            chat_session_count_30d: features.i64_or(
                "engagement",
                "chat_session_count_30d",
                defaults.chat_session_count_30d,
            ),
        }
    }
}

/// Signals feeding the difficulty recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultySignals {
    pub ark_progress_rate_30d: f64,
    pub xp_earning_rate: f64,
    pub motivation_level: f64,
    pub confidence_level: f64,
    pub hours_per_week: f64,
}

impl Default for DifficultySignals {
    fn default() -> Self {
        Self {
            ark_progress_rate_30d: 0.0,
            xp_earning_rate: 0.0,
            motivation_level: 7.0,
            confidence_level: 6.0,
            hours_per_week: 8.0,
        }
    }
}

impl DifficultySignals {
    pub fn from_features(features: &FeatureMap) -> Self {
        let defaults = Self::default();
        Self {
            ark_progress_rate_30d: features.f64_or(
                "performance",
                "ark_progress_rate_30d",
                defaults.ark_progress_rate_30d,
            ),
            xp_earning_rate: features.f64_or(
                "performance",
                "xp_earning_rate",
                defaults.xp_earning_rate,
            ),
            motivation_level: features.f64_or(
                "profile",
                "motivation_level",
                defaults.motivation_level,
            ),
            confidence_level: features.f64_or(
                "profile",
                "confidence_level",
                defaults.confidence_level,
            ),
            hours_per_week: features.f64_or("profile", "hours_per_week", defaults.hours_per_week),
        }
    }
}
