//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the submission lifecycle and the remote scoring service.

mod scoring;

pub use scoring::{interpret_body, ScoreResponse, ScoringError, ScoringService, ServiceHealth};
