//! TUI module: Terminal User Interface using Ratatui.
//!
//! One screen holding the assessment form, the result panel and key hints.

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::Theme;
