//! Scoring port: Trait for the remote risk scoring service.
//!
//! This trait abstracts the HTTP client from the submission lifecycle so the
//! controller can be driven by an in-memory double.

use serde::{Deserialize, Serialize};

use crate::domain::Payload;

/// A well-formed answer from the scoring service.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreResponse {
    /// `{score, message}`
    Scored { score: f64, message: String },
    /// `{error}`
    Rejected { error: String },
}

/// Reported readiness of the scoring service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
}

impl ServiceHealth {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == "ok" && self.model_loaded
    }
}

/// Failures that prevent a usable answer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request failed with status code {status}")]
    HttpStatus { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Score {0} is outside 0-100")]
    ScoreOutOfRange(f64),
}

/// Trait for submitting a normalized record for scoring.
pub trait ScoringService: Send + Sync {
    /// Submit the payload and return the service's answer.
    ///
    /// # Errors
    /// Returns `ScoringError` if the request cannot complete or the answer
    /// is neither a score nor an error message.
    fn predict(&self, payload: &Payload) -> Result<ScoreResponse, ScoringError>;

    /// Probe service readiness.
    ///
    /// # Errors
    /// Returns `ScoringError` if the service cannot be reached.
    fn health(&self) -> Result<ServiceHealth, ScoringError>;
}

/// Interpret a decoded response body.
///
/// A non-empty `error` field wins over a score. Empty, `null`, `false` or
/// zero errors are ignored. A score must be a number within 0–100 and come
/// with a message; anything else is malformed.
///
/// # Errors
/// Returns `MalformedResponse` or `ScoreOutOfRange`.
pub fn interpret_body(body: &serde_json::Value) -> Result<ScoreResponse, ScoringError> {
    let obj = body
        .as_object()
        .ok_or_else(|| ScoringError::MalformedResponse("expected a JSON object".to_string()))?;

    if let Some(error) = obj.get("error").filter(|e| is_set(e)) {
        let error = match error.as_str() {
            Some(s) => s.to_string(),
            None => error.to_string(),
        };
        return Ok(ScoreResponse::Rejected { error });
    }

    let score = match obj.get("score") {
        Some(v) => v.as_f64().ok_or_else(|| {
            ScoringError::MalformedResponse(format!("score is not a number: {v}"))
        })?,
        None => {
            return Err(ScoringError::MalformedResponse(
                "response has neither score nor error".to_string(),
            ))
        }
    };
    if !(0.0..=100.0).contains(&score) {
        return Err(ScoringError::ScoreOutOfRange(score));
    }

    let message = obj
        .get("message")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| ScoringError::MalformedResponse("score without message".to_string()))?
        .to_string();

    Ok(ScoreResponse::Scored { score, message })
}

fn is_set(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}
