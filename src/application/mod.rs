//! Application layer: Use cases and services.
//!
//! Orchestrates the domain form with the scoring port.

mod submission;

pub use submission::{SubmissionController, SubmissionPhase, WORKER_LOST};
