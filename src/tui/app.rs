//! Main TUI application state machine.
//!
//! Handles:
//! - Input event handling
//! - Submission through the background scoring worker
//! - The start-up health probe

use std::io;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};

use crate::adapters::HttpScoringClient;
use crate::application::SubmissionController;
use crate::config::ClientConfig;
use crate::domain::FormStore;
use crate::ports::{ScoringError, ScoringService, ServiceHealth};

use super::styles::Theme;
use super::ui::{
    form::{render_form, FormRow, FormView},
    render_disclaimer,
    result::render_result,
};

/// Reachability of the scoring service, probed once at start-up.
#[derive(Debug, Clone, PartialEq)]
pub enum HealthStatus {
    Checking,
    Ready,
    /// Service answered but reports no model loaded
    Degraded(String),
    Unreachable,
}

impl HealthStatus {
    fn from_probe(probe: Result<ServiceHealth, ScoringError>) -> Self {
        match probe {
            Ok(health) if health.is_ready() => Self::Ready,
            Ok(health) => Self::Degraded(health.status),
            Err(e) => {
                tracing::warn!("Health probe failed: {}", e);
                Self::Unreachable
            }
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Checking => "checking...".to_string(),
            Self::Ready => "ready".to_string(),
            Self::Degraded(status) => format!("{status} (no model)"),
            Self::Unreachable => "unreachable".to_string(),
        }
    }
}

/// Main application state
pub struct App<S: ScoringService + 'static = HttpScoringClient> {
    /// Whether the app should quit
    should_quit: bool,

    form: FormStore,
    view: FormView,
    controller: SubmissionController<S>,

    health: HealthStatus,
    health_rx: Option<Receiver<Result<ServiceHealth, ScoringError>>>,

    /// Service base URL, shown in the header
    endpoint: String,
}

impl App<HttpScoringClient> {
    /// Create the application against the configured scoring service.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> crate::Result<Self> {
        let endpoint = config.base_url().to_string();
        let client = HttpScoringClient::new(config)?;
        Ok(Self::with_service(Arc::new(client), endpoint))
    }
}

impl<S: ScoringService + 'static> App<S> {
    /// Create the application over any scoring service (Composition Root pattern).
    ///
    /// The health probe starts on a background thread right away.
    #[must_use]
    pub fn with_service(service: Arc<S>, endpoint: String) -> Self {
        let (tx, rx) = mpsc::channel();
        let probe = Arc::clone(&service);
        thread::spawn(move || {
            let _ = tx.send(probe.health());
        });

        Self {
            should_quit: false,
            form: FormStore::new(),
            view: FormView::default(),
            controller: SubmissionController::new(service),
            health: HealthStatus::Checking,
            health_rx: Some(rx),
            endpoint,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.controller.poll();
            self.poll_health();

            terminal.draw(|f| self.draw(f))?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(16),   // Form and result
                Constraint::Length(1), // Key hints
                Constraint::Length(2), // Disclaimer
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(chunks[1]);
        render_form(f, body[0], &self.view, &self.form);
        render_result(f, body[1], self.controller.phase(), self.controller.result());

        self.render_footer(f, chunks[2]);
        render_disclaimer(f, chunks[3]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let health_style = match self.health {
            HealthStatus::Ready => Theme::text(),
            HealthStatus::Checking => Theme::text_muted(),
            _ => Theme::danger(),
        };
        let header = Line::from(vec![
            Span::styled(" Heart Attack Risk Assessment ", Theme::title()),
            Span::styled(format!("  {}  ", self.endpoint), Theme::text_muted()),
            Span::styled(self.health.label(), health_style),
        ]);
        f.render_widget(Paragraph::new(header), area);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let submit = if self.controller.is_submitting() {
            "Predicting..."
        } else {
            "Predict"
        };
        let mut spans = Vec::new();
        for (key, desc) in [
            ("↑↓", "Move"),
            ("←→/Space", "Choose"),
            ("Enter", submit),
            ("S", "Sample"),
            ("R", "Reset"),
            ("Ctrl+Q", "Quit"),
        ] {
            spans.push(Span::styled(format!(" [{key}] "), Theme::key_hint()));
            spans.push(Span::styled(desc, Theme::key_desc()));
        }
        if let Some(err) = &self.view.error_message {
            spans.push(Span::styled(format!("  {err}"), Theme::danger()));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn poll_health(&mut self) {
        let probe = match self.health_rx.as_ref().map(Receiver::try_recv) {
            None | Some(Err(TryRecvError::Empty)) => return,
            Some(Ok(probe)) => probe,
            Some(Err(TryRecvError::Disconnected)) => {
                Err(ScoringError::Transport("health probe stopped".to_string()))
            }
        };
        self.health = HealthStatus::from_probe(probe);
        self.health_rx = None;
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let on_choice = matches!(self.view.current(), FormRow::Choice(_));
        match key {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::BackTab => self.view.prev_row(),
            KeyCode::Down | KeyCode::Tab => self.view.next_row(),
            KeyCode::Enter => self.submit(),
            KeyCode::Left => self.view.choose(&mut self.form, 0),
            KeyCode::Right => self.view.choose(&mut self.form, 1),
            KeyCode::Char(' ') if on_choice => self.view.toggle(&mut self.form),
            KeyCode::Char('s' | 'S') => {
                self.form.load_sample();
                self.view.error_message = None;
            }
            KeyCode::Char('r' | 'R') => {
                self.form.reset();
                self.view.error_message = None;
            }
            KeyCode::Char(c) => self.view.input_char(&mut self.form, c),
            KeyCode::Backspace => self.view.delete_char(&mut self.form),
            KeyCode::Delete => self.view.clear_field(&mut self.form),
            _ => {}
        }
    }

    fn submit(&mut self) {
        if !self.controller.submit(&mut self.form) {
            self.view.error_message = Some("A prediction is already running".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::SubmissionPhase;
    use crate::domain::{fields, FieldValue, Payload, Prediction};
    use crate::ports::ScoreResponse;
    use std::sync::Mutex;
    use std::time::Instant;

    /// Scoring double; `predict` blocks until the test releases it.
    struct GatedService {
        gate: Mutex<Receiver<()>>,
        health: Result<ServiceHealth, ScoringError>,
    }

    impl ScoringService for GatedService {
        fn predict(&self, _payload: &Payload) -> Result<ScoreResponse, ScoringError> {
            let _ = self.gate.lock().expect("Gate lock").recv();
            Ok(ScoreResponse::Scored {
                score: 72.0,
                message: "High risk".to_string(),
            })
        }

        fn health(&self) -> Result<ServiceHealth, ScoringError> {
            self.health.clone()
        }
    }

    fn stub_app(
        health: Result<ServiceHealth, ScoringError>,
    ) -> (App<GatedService>, mpsc::Sender<()>) {
        let (release, gate) = mpsc::channel();
        let service = GatedService {
            gate: Mutex::new(gate),
            health,
        };
        let app = App::with_service(Arc::new(service), "http://stub/".to_string());
        (app, release)
    }

    fn ready() -> Result<ServiceHealth, ScoringError> {
        Ok(ServiceHealth {
            status: "ok".to_string(),
            model_loaded: true,
        })
    }

    fn settle_health<S: ScoringService>(app: &mut App<S>) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.health == HealthStatus::Checking && Instant::now() < deadline {
            app.poll_health();
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_health_from_probe() {
        assert_eq!(HealthStatus::from_probe(ready()), HealthStatus::Ready);

        let degraded = ServiceHealth {
            status: "ok".to_string(),
            model_loaded: false,
        };
        assert_eq!(
            HealthStatus::from_probe(Ok(degraded)),
            HealthStatus::Degraded("ok".to_string())
        );

        let failed = Err(ScoringError::Transport("refused".to_string()));
        assert_eq!(HealthStatus::from_probe(failed), HealthStatus::Unreachable);
    }

    #[test]
    fn test_start_up_probe_reports_health() {
        let (mut app, _release) = stub_app(ready());
        settle_health(&mut app);
        assert_eq!(app.health, HealthStatus::Ready);

        let (mut app, _release) = stub_app(Err(ScoringError::Transport("refused".to_string())));
        settle_health(&mut app);
        assert_eq!(app.health, HealthStatus::Unreachable);
        assert_eq!(app.health.label(), "unreachable");
    }

    #[test]
    fn test_sample_and_reset_keys() {
        let (mut app, _release) = stub_app(ready());
        app.handle_key(KeyCode::Char('s'), KeyModifiers::NONE);
        assert_eq!(app.form.get(fields::BMI), Some(&FieldValue::Number(29.7)));

        app.handle_key(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(app.form.get(fields::AGE), Some(&FieldValue::from("")));
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let (mut app, _release) = stub_app(ready());
        // First row is age.
        app.handle_key(KeyCode::Char('4'), KeyModifiers::NONE);
        app.handle_key(KeyCode::Char('5'), KeyModifiers::NONE);
        assert_eq!(app.form.get(fields::AGE), Some(&FieldValue::from("45")));

        app.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(app.form.get(fields::AGE), Some(&FieldValue::from("4")));
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _release) = stub_app(ready());
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);

        let (mut app, _release) = stub_app(ready());
        app.handle_key(KeyCode::Esc, KeyModifiers::NONE);
        assert!(app.should_quit);
    }

    #[test]
    fn test_enter_while_predicting_is_refused() {
        let (mut app, release) = stub_app(ready());
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.controller.is_submitting());

        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.view.error_message.is_some());

        release.send(()).expect("Worker waiting");
        let result = app.controller.wait().cloned().expect("Settled");
        assert_eq!(result.prediction().map(Prediction::label), Some("72%".to_string()));
        assert_eq!(app.controller.phase(), SubmissionPhase::Idle);
    }
}
