//! Level Derivation Thresholds

use serde::{Deserialize, Serialize};

/// Risk level bucket for dropout/burnout scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Derive the level from a 0-100 score. Pure and monotonic; the same
    /// thresholds apply whether the score came from a model or the rules.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            RiskLevel::Critical
        } else if score >= 60.0 {
            RiskLevel::High
        } else if score >= 40.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// High and critical levels trigger intervention recommendations.
    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }
}

/// Recommended difficulty tier for a learner's plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Foundational,
    Standard,
    Ambitious,
}

impl DifficultyLevel {
    /// Derive the tier from a 0.5-5.0 difficulty score.
    pub fn from_score(score: f64) -> Self {
        if score >= 4.0 {
            DifficultyLevel::Ambitious
        } else if score >= 2.5 {
            DifficultyLevel::Standard
        } else {
            DifficultyLevel::Foundational
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Foundational => "foundational",
            DifficultyLevel::Standard => "standard",
            DifficultyLevel::Ambitious => "ambitious",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_thresholds() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(39.99), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(40.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(59.99), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(60.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(79.99), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(80.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(100.0), RiskLevel::Critical);
    }

    #[test]
    fn difficulty_thresholds() {
        assert_eq!(DifficultyLevel::from_score(0.5), DifficultyLevel::Foundational);
        assert_eq!(DifficultyLevel::from_score(2.49), DifficultyLevel::Foundational);
        assert_eq!(DifficultyLevel::from_score(2.5), DifficultyLevel::Standard);
        assert_eq!(DifficultyLevel::from_score(3.99), DifficultyLevel::Standard);
        assert_eq!(DifficultyLevel::from_score(4.0), DifficultyLevel::Ambitious);
        assert_eq!(DifficultyLevel::from_score(5.0), DifficultyLevel::Ambitious);
    }
}
