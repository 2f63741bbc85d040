//! Client configuration.
//!
//! Resolved once at start-up from the environment and never changed while
//! the application runs.

use std::time::Duration;

use reqwest::Url;

/// Scoring endpoint used when `HEARTRISK_API_BASE` is unset.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

/// Request timeout used when `HEARTRISK_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid scoring base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid timeout {0:?}: expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Settings for talking to the scoring service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .expect("Valid default URL")
    }
}

impl ClientConfig {
    /// Build a config for the given base URL.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidBaseUrl` unless `base` is an absolute
    /// http(s) URL.
    pub fn new(base: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: base.to_string(),
            reason,
        };

        // Keep any path prefix, e.g. a service mounted under /api.
        let mut normalized = base.trim().trim_end_matches('/').to_string();
        normalized.push('/');

        let base_url = Url::parse(&normalized).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", base_url.scheme())));
        }

        Ok(Self { base_url, timeout })
    }

    /// Read `HEARTRISK_API_BASE` and `HEARTRISK_TIMEOUT_SECS`.
    ///
    /// # Errors
    /// Returns `ConfigError` if either variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = std::env::var("HEARTRISK_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let timeout = match std::env::var("HEARTRISK_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        Self::new(&base, timeout)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of a route relative to the base, e.g. `endpoint("predict")`.
    #[must_use]
    pub fn endpoint(&self, route: &str) -> Url {
        self.base_url
            .join(route.trim_start_matches('/'))
            .unwrap_or_else(|_| self.base_url.clone())
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidTimeout(raw.to_string()))
}
