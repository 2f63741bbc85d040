//! Scoring outcomes and their risk classification.

use serde::{Deserialize, Serialize};

/// Risk tier derived from a 0–100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Score below 30
    Low,
    /// Score from 30 up to 60
    Moderate,
    /// Score of 60 and above
    High,
}

impl RiskLevel {
    /// Classify a score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            Self::Low
        } else if score < 60.0 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (34, 197, 94),     // Green (#22C55E)
            Self::Moderate => (245, 158, 11), // Amber (#F59E0B)
            Self::High => (239, 68, 68),     // Red (#EF4444)
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// A successful score from the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Risk score, 0 to 100
    pub score: f64,

    /// Service-provided advice text
    pub message: String,

    /// When the response arrived
    pub received_at: chrono::DateTime<chrono::Utc>,
}

impl Prediction {
    #[must_use]
    pub fn new(score: f64, message: impl Into<String>) -> Self {
        Self {
            score,
            message: message.into(),
            received_at: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.score)
    }

    /// Integer percentage label, e.g. `72%`.
    #[must_use]
    pub fn label(&self) -> String {
        score_label(self.score)
    }
}

/// Render a score as an integer percentage.
#[must_use]
pub fn score_label(score: f64) -> String {
    format!("{}%", score.round())
}

/// Where a failed submission went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The service answered with an explicit error message
    Service,
    /// The request did not complete or the answer was unusable
    Transport,
}

/// Outcome of one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubmissionResult {
    Scored(Prediction),
    Failed { kind: FailureKind, message: String },
}

impl SubmissionResult {
    #[must_use]
    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            Self::Scored(p) => Some(p),
            Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Scored(_) => None,
            Self::Failed { message, .. } => Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_thresholds() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(15.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(29.99), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(45.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(59.99), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(60.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(72.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100.0), RiskLevel::High);
    }

    #[test]
    fn test_prediction_label() {
        let p = Prediction::new(72.0, "High risk");
        assert_eq!(p.label(), "72%");
        assert_eq!(p.risk_level(), RiskLevel::High);
        assert_eq!(score_label(33.5), "34%");
        assert_eq!(score_label(8.25), "8%");
    }

    #[test]
    fn test_result_accessors() {
        let ok = SubmissionResult::Scored(Prediction::new(15.0, "Low risk"));
        assert!(ok.prediction().is_some());
        assert!(ok.error().is_none());

        let failed = SubmissionResult::Failed {
            kind: FailureKind::Service,
            message: "invalid input".to_string(),
        };
        assert!(failed.prediction().is_none());
        assert_eq!(failed.error(), Some("invalid input"));
    }
}
