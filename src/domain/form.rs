//! Form state and the store that owns it.

use std::collections::BTreeMap;

use serde::Serialize;
use zeroize::Zeroize;

use super::choice::ExclusiveChoice;
use super::derived::{format_bmi, recompute_bmi, BMI_INPUTS};
use super::fields::{self, DefaultValue, FieldSpec};
use super::value::FieldValue;

/// Errors raised by form mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Unknown form field: {0}")]
    InvalidField(String),
}

/// Read-only snapshot of every form field, keyed by wire name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormState {
    values: BTreeMap<&'static str, FieldValue>,
}

impl FormState {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Fields paired with their registry entry, in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldSpec, &FieldValue)> + '_ {
        fields::all()
            .iter()
            .filter_map(move |spec| self.values.get(spec.name).map(|v| (spec, v)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Owner of the current form values.
///
/// Values live in schema order, one slot per registered field. Every write
/// goes through [`FormStore::set_field`] or [`FormStore::apply_group_choice`];
/// both recompute BMI in the same call when height or weight changes.
#[derive(Debug, Clone)]
pub struct FormStore {
    values: Vec<FieldValue>,
}

impl Default for FormStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FormStore {
    /// Create a store seeded from registry defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: fields::all().iter().map(default_value).collect(),
        }
    }

    /// Replace one field's value.
    ///
    /// # Errors
    /// Returns `FormError::InvalidField` if `name` is not registered.
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), FormError> {
        let index = Self::slot(name)?;
        self.values[index] = value.into();

        if BMI_INPUTS.contains(&name) {
            self.refresh_derived();
        }
        Ok(())
    }

    /// Apply a set of assignments as one update.
    ///
    /// All names are checked before anything is written, so a bad name leaves
    /// the state untouched. Callers pass the full sibling set of a group.
    ///
    /// # Errors
    /// Returns `FormError::InvalidField` for the first unregistered name.
    pub fn apply_group_choice(&mut self, patch: &[(&str, FieldValue)]) -> Result<(), FormError> {
        let slots = patch
            .iter()
            .map(|(name, _)| Self::slot(name))
            .collect::<Result<Vec<_>, _>>()?;

        for (index, (_, value)) in slots.into_iter().zip(patch) {
            self.values[index] = value.clone();
        }

        if patch.iter().any(|(name, _)| BMI_INPUTS.contains(name)) {
            self.refresh_derived();
        }
        Ok(())
    }

    /// Apply a typed exclusive choice.
    pub fn choose<C: ExclusiveChoice>(&mut self, choice: C) {
        // Choice patches only name registered fields.
        if let Err(e) = self.apply_group_choice(&choice.patch()) {
            tracing::error!("Choice patch rejected: {}", e);
        }
    }

    /// Recompute derived fields from their inputs.
    ///
    /// Leaves BMI untouched when height or weight is not a positive number.
    pub fn refresh_derived(&mut self) {
        let (Some(h), Some(w), Some(b)) = (
            fields::index_of(fields::HEIGHT),
            fields::index_of(fields::WEIGHT),
            fields::index_of(fields::BMI),
        ) else {
            return;
        };

        if let Some(bmi) = recompute_bmi(&self.values[h], &self.values[w]) {
            self.values[b] = FieldValue::Number(bmi);
        }
    }

    /// Current value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        fields::index_of(name).map(|i| &self.values[i])
    }

    /// Text shown for a field in its input box.
    ///
    /// A computed BMI keeps its one-decimal form, so 25.0 reads "25.0".
    #[must_use]
    pub fn display(&self, name: &str) -> String {
        match self.get(name) {
            Some(FieldValue::Number(x)) if name == fields::BMI => format_bmi(*x),
            Some(value) => value.display(),
            None => String::new(),
        }
    }

    /// Snapshot of the whole form.
    #[must_use]
    pub fn state(&self) -> FormState {
        FormState {
            values: fields::all()
                .iter()
                .zip(&self.values)
                .map(|(spec, value)| (spec.name, value.clone()))
                .collect(),
        }
    }

    /// Restore defaults, wiping typed text from memory first.
    pub fn reset(&mut self) {
        for value in self.values.iter_mut() {
            if let FieldValue::Text(s) = value {
                s.zeroize();
            }
        }
        *self = Self::new();
    }

    /// Fill the form with a representative record.
    pub fn load_sample(&mut self) {
        let sample = [
            (fields::AGE, "54"),
            (fields::SYSTOLIC_BP, "142"),
            (fields::DIASTOLIC_BP, "91"),
            (fields::HEART_RATE, "84"),
            (fields::SPO2, "96"),
            (fields::TEMPERATURE, "36.8"),
            (fields::HEIGHT, "172"),
            (fields::WEIGHT, "88"),
            (fields::ECG_HEART_RATE, "83"),
            (fields::ECG_QRS_DURATION, "102"),
            (fields::ECG_ST_DEVIATION, "0.12"),
            (fields::ECG_R_PEAK, "1.4"),
            (fields::BLOOD_SUGAR, "128"),
        ];
        for (name, value) in sample {
            if let Err(e) = self.set_field(name, value) {
                tracing::error!("Sample value rejected: {}", e);
            }
        }
    }

    fn slot(name: &str) -> Result<usize, FormError> {
        fields::index_of(name).ok_or_else(|| FormError::InvalidField(name.to_string()))
    }
}

fn default_value(spec: &FieldSpec) -> FieldValue {
    match spec.default {
        DefaultValue::Empty => FieldValue::Text(String::new()),
        DefaultValue::Flag(b) => FieldValue::Flag(b),
    }
}
