//! Result panel: score gauge, risk tier and service message.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::application::SubmissionPhase;
use crate::domain::{Prediction, SubmissionResult};
use crate::tui::styles::Theme;

/// Color of the result panel.
///
/// Only a successful score picks a tier color; everything else keeps the
/// neutral accent.
#[must_use]
pub fn panel_color(result: Option<&SubmissionResult>) -> Color {
    match result.and_then(SubmissionResult::prediction) {
        Some(p) => Theme::risk_color(p.risk_level()),
        None => Theme::ACCENT,
    }
}

/// Render the result panel for the current submission state.
pub fn render_result(
    f: &mut Frame,
    area: Rect,
    phase: SubmissionPhase,
    result: Option<&SubmissionResult>,
) {
    let color = panel_color(result);
    let block = Block::default()
        .title(Span::styled(
            " Your Risk Score ",
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match (phase, result) {
        (SubmissionPhase::Submitting, _) => render_message(
            f,
            inner,
            vec![Line::from(Span::styled("Predicting...", Theme::focused()))],
        ),
        (SubmissionPhase::Idle, None) => render_message(
            f,
            inner,
            vec![
                Line::from(Span::styled("No score yet", Theme::text_secondary())),
                Line::from(""),
                Line::from(Span::styled(
                    "Fill in the form and press Enter to predict",
                    Theme::text_muted(),
                )),
            ],
        ),
        (SubmissionPhase::Idle, Some(SubmissionResult::Scored(prediction))) => {
            render_prediction(f, inner, prediction, color);
        }
        (SubmissionPhase::Idle, Some(SubmissionResult::Failed { message, .. })) => render_message(
            f,
            inner,
            vec![
                Line::from(Span::styled("! Prediction failed", Theme::danger())),
                Line::from(""),
                Line::from(Span::styled(message.clone(), Theme::danger())),
            ],
        ),
    }
}

fn render_message(f: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(content, area);
}

fn render_prediction(f: &mut Frame, area: Rect, prediction: &Prediction, color: Color) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Gauge
            Constraint::Length(2), // Tier
            Constraint::Min(0),    // Message
        ])
        .margin(1)
        .split(area);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).border_style(Theme::border()))
        .gauge_style(Style::default().fg(color).bg(Theme::TRAIL))
        .percent(gauge_percent(prediction.score))
        .label(Span::styled(
            prediction.label(),
            Style::default().fg(Theme::PRIMARY).add_modifier(Modifier::BOLD),
        ));
    f.render_widget(gauge, chunks[0]);

    let tier = Paragraph::new(Line::from(vec![
        Span::styled("Risk: ", Theme::text_secondary()),
        Span::styled(
            prediction.risk_level().to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  at {}", prediction.received_at.format("%H:%M:%S")),
            Theme::text_muted(),
        ),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(tier, chunks[1]);

    let message = Paragraph::new(Line::from(Span::styled(
        prediction.message.clone(),
        Theme::text(),
    )))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(message, chunks[2]);
}

fn gauge_percent(score: f64) -> u16 {
    // Scores are validated to 0-100 before they get here.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pct = score.round().clamp(0.0, 100.0) as u16;
    pct
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FailureKind, RiskLevel};
    use ratatui::{backend::TestBackend, Terminal};

    fn render_to_text(phase: SubmissionPhase, result: Option<&SubmissionResult>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 14)).expect("Test terminal");
        terminal
            .draw(|f| render_result(f, f.area(), phase, result))
            .expect("Should draw");

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_panel_color_follows_tier() {
        let scored = |s: f64| SubmissionResult::Scored(Prediction::new(s, "msg"));
        assert_eq!(panel_color(Some(&scored(72.0))), Theme::risk_color(RiskLevel::High));
        assert_eq!(panel_color(Some(&scored(15.0))), Theme::risk_color(RiskLevel::Low));
        assert_eq!(panel_color(Some(&scored(45.0))), Theme::risk_color(RiskLevel::Moderate));
        assert_eq!(panel_color(None), Theme::ACCENT);
    }

    #[test]
    fn test_failure_shows_no_tier_color() {
        let failed = SubmissionResult::Failed {
            kind: FailureKind::Service,
            message: "invalid input".to_string(),
        };
        assert_eq!(panel_color(Some(&failed)), Theme::ACCENT);

        let text = render_to_text(SubmissionPhase::Idle, Some(&failed));
        assert!(text.contains("invalid input"));
        assert!(!text.contains('%'));
    }

    #[test]
    fn test_scored_panel_shows_percentage_and_message() {
        let result = SubmissionResult::Scored(Prediction::new(72.0, "High risk"));
        let text = render_to_text(SubmissionPhase::Idle, Some(&result));
        assert!(text.contains("72%"));
        assert!(text.contains("HIGH"));
        assert!(text.contains("High risk"));
    }

    #[test]
    fn test_submitting_panel() {
        let text = render_to_text(SubmissionPhase::Submitting, None);
        assert!(text.contains("Predicting..."));
    }

    #[test]
    fn test_gauge_percent() {
        assert_eq!(gauge_percent(72.4), 72);
        assert_eq!(gauge_percent(99.6), 100);
        assert_eq!(gauge_percent(0.0), 0);
    }
}
