//! Normalization of form state into the scoring request body.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use super::fields::FieldKind;
use super::form::FormState;
use super::value::{parse_number, FieldValue};

/// JSON object sent to the scoring service, one entry per registered field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Convert form state into the transmission record.
///
/// Best-effort coercion only: text that reads as a finite number becomes a
/// JSON number, anything else (including empty text) is forwarded as-is for
/// the service to reject.
#[must_use]
pub fn normalize(state: &FormState) -> Payload {
    let map = state
        .iter()
        .map(|(spec, value)| (spec.name.to_string(), normalize_field(spec.kind, value)))
        .collect();
    Payload(map)
}

fn normalize_field(kind: FieldKind, value: &FieldValue) -> Value {
    match kind {
        FieldKind::NumericText => numeric_value(value),
        FieldKind::BinaryFlag | FieldKind::CategoricalGroup(_) => flag_value(value),
    }
}

fn numeric_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(s) => match parse_number(s) {
            Some(x) => number_or_text(x, || s.clone()),
            None => Value::String(s.clone()),
        },
        FieldValue::Number(x) => number_or_text(*x, || x.to_string()),
        FieldValue::Flag(b) => Value::from(*b),
    }
}

/// Flags pass through; a flag edited as text follows the numeric rule.
fn flag_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Flag(b) => Value::from(*b),
        other => numeric_value(other),
    }
}

/// JSON number for `x`, integral values without a fractional part.
fn number_or_text(x: f64, fallback: impl FnOnce() -> String) -> Value {
    if x.fract() == 0.0 && x.abs() <= MAX_SAFE_INTEGER {
        // Range checked above.
        #[allow(clippy::cast_possible_truncation)]
        return Value::from(x as i64);
    }
    Number::from_f64(x).map_or_else(|| Value::String(fallback()), Value::Number)
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
