//! Derived field computation.
//!
//! Body-mass index is the only derived field: `weight_kg / (height_cm / 100)^2`,
//! rounded to one decimal place.

use super::value::FieldValue;

/// Fields whose change triggers a BMI recomputation.
pub const BMI_INPUTS: [&str; 2] = [super::fields::HEIGHT, super::fields::WEIGHT];

/// Compute BMI from height (cm) and weight (kg).
///
/// Returns `None` unless both inputs read as numbers strictly greater than
/// zero; the caller then leaves the BMI field untouched.
#[must_use]
pub fn recompute_bmi(height_cm: &FieldValue, weight_kg: &FieldValue) -> Option<f64> {
    let height = height_cm.as_number().filter(|h| *h > 0.0)?;
    let weight = weight_kg.as_number().filter(|w| *w > 0.0)?;

    let meters = height / 100.0;
    round_one_decimal(weight / (meters * meters))
}

/// BMI as shown in the form, always with one decimal digit.
#[must_use]
pub fn format_bmi(bmi: f64) -> String {
    format!("{bmi:.1}")
}

/// Round through one-decimal formatting so the stored value matches what
/// the user sees.
fn round_one_decimal(x: f64) -> Option<f64> {
    if !x.is_finite() {
        return None;
    }
    format_bmi(x).parse().ok()
}
