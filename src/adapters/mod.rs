//! Adapters layer: Concrete implementations of ports.
//!
//! - `http`: reqwest client for the remote scoring service
//! - `sanitize`: redaction of clinical values in logs

pub mod http;
pub mod sanitize;

pub use http::HttpScoringClient;
