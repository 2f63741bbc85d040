//! Submission controller: Orchestrates one scoring request at a time.
//!
//! Lifecycle: `Idle -> Submitting -> (Success | Failure) -> Idle`.
//!
//! The request runs on a background worker thread so the UI loop keeps
//! drawing; the outcome comes back over a channel and is picked up by
//! [`SubmissionController::poll`].

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::domain::{normalize, FailureKind, FormStore, Prediction, SubmissionResult};
use crate::ports::{ScoreResponse, ScoringService};

/// Reported when a worker exits without sending an outcome.
pub const WORKER_LOST: &str = "Scoring worker stopped unexpectedly";

/// Whether a request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
}

/// Handle to a running submission worker.
struct PendingSubmission {
    outcome_rx: Receiver<SubmissionResult>,
    _handle: JoinHandle<()>,
}

/// Drives submissions against a scoring service.
pub struct SubmissionController<S>
where
    S: ScoringService + 'static,
{
    service: Arc<S>,
    pending: Option<PendingSubmission>,
    result: Option<SubmissionResult>,
}

impl<S> SubmissionController<S>
where
    S: ScoringService + 'static,
{
    /// Create a controller in the `Idle` phase with no result.
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            pending: None,
            result: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SubmissionPhase {
        if self.pending.is_some() {
            SubmissionPhase::Submitting
        } else {
            SubmissionPhase::Idle
        }
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.phase() == SubmissionPhase::Submitting
    }

    /// Outcome of the last settled submission.
    #[must_use]
    pub fn result(&self) -> Option<&SubmissionResult> {
        self.result.as_ref()
    }

    /// Start a submission from the current form.
    ///
    /// Returns `false` without doing anything while a request is in flight.
    /// Derived fields are refreshed before the form is read, so the payload
    /// never carries a stale BMI.
    pub fn submit(&mut self, form: &mut FormStore) -> bool {
        if self.is_submitting() {
            tracing::debug!("Submit ignored: request already in flight");
            return false;
        }

        form.refresh_derived();
        let payload = normalize(&form.state());
        self.result = None;

        let (tx, rx) = mpsc::channel();
        let service = Arc::clone(&self.service);
        let handle = thread::spawn(move || {
            tracing::info!("Submitting record for scoring...");
            let outcome = match service.predict(&payload) {
                Ok(ScoreResponse::Scored { score, message }) => {
                    SubmissionResult::Scored(Prediction::new(score, message))
                }
                Ok(ScoreResponse::Rejected { error }) => SubmissionResult::Failed {
                    kind: FailureKind::Service,
                    message: error,
                },
                Err(e) => SubmissionResult::Failed {
                    kind: FailureKind::Transport,
                    message: e.to_string(),
                },
            };
            let _ = tx.send(outcome);
        });

        self.pending = Some(PendingSubmission {
            outcome_rx: rx,
            _handle: handle,
        });
        true
    }

    /// Pick up the worker's outcome without blocking.
    ///
    /// Returns `true` if a submission settled during this call.
    pub fn poll(&mut self) -> bool {
        let outcome = match self.pending.as_ref().map(|p| p.outcome_rx.try_recv()) {
            None | Some(Err(TryRecvError::Empty)) => return false,
            Some(Ok(outcome)) => outcome,
            Some(Err(TryRecvError::Disconnected)) => lost_worker(),
        };
        self.settle(outcome);
        true
    }

    /// Block until the in-flight submission settles.
    pub fn wait(&mut self) -> Option<&SubmissionResult> {
        if let Some(pending) = self.pending.as_ref() {
            let outcome = pending.outcome_rx.recv().unwrap_or_else(|_| lost_worker());
            self.settle(outcome);
        }
        self.result.as_ref()
    }

    fn settle(&mut self, outcome: SubmissionResult) {
        self.pending = None;
        match &outcome {
            SubmissionResult::Scored(p) => tracing::info!(
                "Submission scored: {} ({})",
                p.label(),
                p.risk_level()
            ),
            SubmissionResult::Failed { kind, message } => {
                tracing::warn!("Submission failed ({:?}): {}", kind, message);
            }
        }
        self.result = Some(outcome);
    }
}

fn lost_worker() -> SubmissionResult {
    SubmissionResult::Failed {
        kind: FailureKind::Transport,
        message: WORKER_LOST.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::HttpScoringClient;
    use crate::config::ClientConfig;
    use crate::domain::{fields, Payload, RiskLevel};
    use crate::ports::{ScoringError, ServiceHealth};
    use serde_json::json;
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory service that answers with a fixed response.
    struct StubService {
        response: Result<ScoreResponse, ScoringError>,
        calls: AtomicUsize,
        last_payload: Mutex<Option<Payload>>,
        gate: Option<Mutex<Receiver<()>>>,
    }

    impl StubService {
        fn answering(response: Result<ScoreResponse, ScoringError>) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
                last_payload: Mutex::new(None),
                gate: None,
            }
        }

        fn scored(score: f64, message: &str) -> Self {
            Self::answering(Ok(ScoreResponse::Scored {
                score,
                message: message.to_string(),
            }))
        }
    }

    impl ScoringService for StubService {
        fn predict(&self, payload: &Payload) -> Result<ScoreResponse, ScoringError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_payload.lock().expect("Payload lock") = Some(payload.clone());
            if let Some(gate) = &self.gate {
                let _ = gate.lock().expect("Gate lock").recv();
            }
            self.response.clone()
        }

        fn health(&self) -> Result<ServiceHealth, ScoringError> {
            Ok(ServiceHealth {
                status: "ok".to_string(),
                model_loaded: true,
            })
        }
    }

    struct PanickingService;

    impl ScoringService for PanickingService {
        fn predict(&self, _payload: &Payload) -> Result<ScoreResponse, ScoringError> {
            panic!("model exploded");
        }

        fn health(&self) -> Result<ServiceHealth, ScoringError> {
            Err(ScoringError::Transport("down".to_string()))
        }
    }

    #[test]
    fn test_success_records_score_and_message() {
        let service = Arc::new(StubService::scored(72.0, "High risk"));
        let mut controller = SubmissionController::new(service);
        let mut form = FormStore::new();

        assert!(controller.submit(&mut form));
        assert_eq!(controller.phase(), SubmissionPhase::Submitting);

        let result = controller.wait().expect("Settled").clone();
        let prediction = result.prediction().expect("Scored");
        assert_eq!(prediction.message, "High risk");
        assert_eq!(prediction.label(), "72%");
        assert_eq!(prediction.risk_level(), RiskLevel::High);
        assert_eq!(controller.phase(), SubmissionPhase::Idle);
    }

    #[test]
    fn test_tiers_for_returned_scores() {
        for (score, tier) in [(15.0, RiskLevel::Low), (45.0, RiskLevel::Moderate)] {
            let service = Arc::new(StubService::scored(score, "ok"));
            let mut controller = SubmissionController::new(service);
            controller.submit(&mut FormStore::new());
            let result = controller.wait().expect("Settled");
            assert_eq!(result.prediction().map(Prediction::risk_level), Some(tier));
        }
    }

    #[test]
    fn test_service_error_is_surfaced_verbatim() {
        let service = Arc::new(StubService::answering(Ok(ScoreResponse::Rejected {
            error: "invalid input".to_string(),
        })));
        let mut controller = SubmissionController::new(service);

        controller.submit(&mut FormStore::new());
        let result = controller.wait().expect("Settled");
        assert_eq!(
            result,
            &SubmissionResult::Failed {
                kind: FailureKind::Service,
                message: "invalid input".to_string()
            }
        );
        assert!(result.prediction().is_none());
    }

    #[test]
    fn test_second_submit_while_in_flight_is_ignored() {
        let (release, gate) = mpsc::channel();
        let mut stub = StubService::scored(20.0, "Low risk");
        stub.gate = Some(Mutex::new(gate));
        let service = Arc::new(stub);
        let mut controller = SubmissionController::new(Arc::clone(&service));
        let mut form = FormStore::new();

        assert!(controller.submit(&mut form));
        assert!(!controller.submit(&mut form));
        assert!(!controller.poll());

        release.send(()).expect("Worker waiting");
        controller.wait();
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);

        // Settled: a new submission is accepted again.
        release.send(()).expect("Gate still open");
        assert!(controller.submit(&mut form));
        controller.wait();
        assert_eq!(service.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_new_submission_clears_previous_result() {
        let (release, gate) = mpsc::channel();
        let mut stub = StubService::scored(50.0, "Moderate");
        stub.gate = Some(Mutex::new(gate));
        let mut controller = SubmissionController::new(Arc::new(stub));
        let mut form = FormStore::new();

        release.send(()).expect("Gate open");
        controller.submit(&mut form);
        assert!(controller.wait().is_some());

        controller.submit(&mut form);
        assert!(controller.result().is_none());
        release.send(()).expect("Worker waiting");
        assert!(controller.wait().is_some());
    }

    #[test]
    fn test_submit_uses_fresh_bmi() {
        let service = Arc::new(StubService::scored(10.0, "Low risk"));
        let mut controller = SubmissionController::new(Arc::clone(&service));
        let mut form = FormStore::new();
        form.set_field(fields::HEIGHT, "180").expect("Known field");
        form.set_field(fields::WEIGHT, "81").expect("Known field");
        // Hand-typed value that no longer matches height/weight.
        form.set_field(fields::BMI, "19.0").expect("Known field");

        controller.submit(&mut form);
        controller.wait();

        let payload = service
            .last_payload
            .lock()
            .expect("Payload lock")
            .clone()
            .expect("Payload sent");
        assert_eq!(payload.get(fields::BMI), Some(&json!(25)));
        assert_eq!(payload.get(fields::HEIGHT), Some(&json!(180)));
    }

    #[test]
    fn test_panicking_worker_settles_as_failure() {
        let mut controller = SubmissionController::new(Arc::new(PanickingService));
        controller.submit(&mut FormStore::new());
        let result = controller.wait().expect("Settled");
        assert_eq!(result.error(), Some(WORKER_LOST));
        assert_eq!(controller.phase(), SubmissionPhase::Idle);
    }

    #[test]
    fn test_poll_eventually_settles() {
        let mut controller = SubmissionController::new(Arc::new(StubService::scored(61.0, "High")));
        controller.submit(&mut FormStore::new());

        let mut settled = false;
        for _ in 0..200 {
            if controller.poll() {
                settled = true;
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert!(settled);
        assert!(!controller.poll());
    }

    #[test]
    fn test_connection_refused_returns_to_idle_with_message() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("Should bind");
            listener.local_addr().expect("Bound address").port()
        };
        let config = ClientConfig::new(&format!("http://127.0.0.1:{port}"), Duration::from_secs(2))
            .expect("Valid URL");
        let client = HttpScoringClient::new(config).expect("Client builds");
        let mut controller = SubmissionController::new(Arc::new(client));

        controller.submit(&mut FormStore::new());
        let result = controller.wait().expect("Settled").clone();
        match result {
            SubmissionResult::Failed { kind, message } => {
                assert_eq!(kind, FailureKind::Transport);
                assert!(!message.is_empty());
            }
            other => panic!("Expected failure, got {other:?}"),
        }
        assert_eq!(controller.phase(), SubmissionPhase::Idle);
    }
}
