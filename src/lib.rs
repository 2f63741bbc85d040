//! # Heartrisk
//!
//! Terminal client for a remote heart-attack risk scoring service.
//!
//! This crate provides:
//! - A fixed-schema assessment form with derived body-mass index
//! - Normalization of form text into the service's numeric payload
//! - A non-blocking submission lifecycle with color-coded results
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Field registry, form store, payload normalizer, risk tiers
//! - `ports`: Trait boundary to the scoring service
//! - `adapters`: Concrete implementations (reqwest HTTP client, log redaction)
//! - `application`: Submission lifecycle orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{FormStore, Prediction, RiskLevel, SubmissionResult};

/// Result type for Heartrisk operations
pub type Result<T> = std::result::Result<T, HeartRiskError>;

/// Main error type for Heartrisk
#[derive(Debug, thiserror::Error)]
pub enum HeartRiskError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Form error: {0}")]
    Form(#[from] domain::FormError),

    #[error("Scoring service error: {0}")]
    Scoring(#[from] ports::ScoringError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
