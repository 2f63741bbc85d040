//! Color palette and preset styles.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::RiskLevel;

/// Application theme.
pub struct Theme;

impl Theme {
    /// Violet accent, used whenever no risk tier applies
    pub const ACCENT: Color = Color::Rgb(167, 139, 250); // #A78BFA

    /// Deep purple for headings
    pub const PRIMARY: Color = Color::Rgb(126, 34, 206); // #7E22CE

    /// Pink highlight for the focused input
    pub const HIGHLIGHT: Color = Color::Rgb(244, 114, 182); // #F472B6

    pub const BORDER: Color = Color::Rgb(148, 163, 184); // #94A3B8

    /// Error text
    pub const DANGER: Color = Color::Rgb(220, 38, 38); // #DC2626

    /// Gauge trail
    pub const TRAIL: Color = Color::Rgb(229, 231, 235); // #E5E7EB

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    /// Color for a risk tier.
    #[must_use]
    pub fn risk_color(level: RiskLevel) -> Color {
        let (r, g, b) = level.color();
        Color::Rgb(r, g, b)
    }

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected option of a choice control
    #[must_use]
    pub fn option_selected() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .bg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::HIGHLIGHT)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }
}
