//! HTTP adapter for the scoring service.
//!
//! Talks JSON over `POST {base}/predict` and `GET {base}/health` using a
//! blocking `reqwest` client. Calls are made from the submission worker
//! thread, never from the UI loop.

use reqwest::blocking::Client;

use crate::config::ClientConfig;
use crate::domain::Payload;
use crate::ports::{interpret_body, ScoreResponse, ScoringError, ScoringService, ServiceHealth};

/// Longest response excerpt kept in an error.
const MAX_ERROR_BODY: usize = 512;

/// `ScoringService` backed by the remote HTTP API.
#[derive(Debug, Clone)]
pub struct HttpScoringClient {
    client: Client,
    config: ClientConfig,
}

impl HttpScoringClient {
    /// Create a client for the configured endpoint.
    ///
    /// # Errors
    /// Returns `ScoringError::Transport` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ScoringError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("heartrisk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport)?;

        Ok(Self { client, config })
    }
}

impl ScoringService for HttpScoringClient {
    fn predict(&self, payload: &Payload) -> Result<ScoreResponse, ScoringError> {
        let url = self.config.endpoint("predict");
        tracing::debug!("POST {} ({} fields)", url, payload.len());

        let response = self.client.post(url).json(payload).send().map_err(transport)?;
        let status = response.status();
        let text = response.text().map_err(transport)?;
        let body = serde_json::from_str::<serde_json::Value>(&text).ok();

        if !status.is_success() {
            // An explicit error message is still the service speaking.
            if let Some(Ok(rejected @ ScoreResponse::Rejected { .. })) =
                body.as_ref().map(interpret_body)
            {
                return Ok(rejected);
            }
            return Err(ScoringError::HttpStatus {
                status: status.as_u16(),
                body: excerpt(&text),
            });
        }

        let body = body.ok_or_else(|| {
            ScoringError::MalformedResponse(format!("body is not JSON: {}", excerpt(&text)))
        })?;
        interpret_body(&body)
    }

    fn health(&self) -> Result<ServiceHealth, ScoringError> {
        let url = self.config.endpoint("health");
        let response = self.client.get(url).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScoringError::HttpStatus {
                status: status.as_u16(),
                body: excerpt(&response.text().unwrap_or_default()),
            });
        }
        response
            .json::<ServiceHealth>()
            .map_err(|e| ScoringError::MalformedResponse(e.to_string()))
    }
}

fn transport(e: reqwest::Error) -> ScoringError {
    ScoringError::Transport(e.to_string())
}

fn excerpt(text: &str) -> String {
    if text.len() <= MAX_ERROR_BODY {
        return text.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
