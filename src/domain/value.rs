//! Field values as held by the form.

use serde::{Deserialize, Serialize};

/// Current value of a single form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Raw text as typed by the user
    Text(String),
    /// 0/1 selection from a choice control
    Flag(u8),
    /// Already-numeric value (derived fields)
    Number(f64),
}

impl FieldValue {
    /// Numeric reading of the value, if it has one.
    ///
    /// Text is trimmed first; empty text and non-finite results (`inf`, `NaN`)
    /// are not numbers.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Text(s) => parse_number(s),
            Self::Flag(b) => Some(f64::from(*b)),
            Self::Number(x) if x.is_finite() => Some(*x),
            Self::Number(_) => None,
        }
    }

    /// Text shown in an input box.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Flag(b) => b.to_string(),
            Self::Number(x) => format_number(*x),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<u8> for FieldValue {
    fn from(b: u8) -> Self {
        Self::Flag(b)
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        Self::Number(x)
    }
}

/// Parse user text as a finite decimal number.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|x| x.is_finite())
}

fn format_number(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{x:.0}")
    } else {
        x.to_string()
    }
}
