//! Domain layer: Core business types and logic.
//!
//! Pure Rust types with no I/O: the field registry, the form store with its
//! derived BMI, the payload normalizer and score classification.

pub mod choice;
mod derived;
pub mod fields;
mod form;
mod payload;
mod risk;
mod value;

pub use choice::{Control, ExclusiveChoice, GroupPatch};
pub use derived::{format_bmi, recompute_bmi};
pub use fields::{FieldKind, FieldSpec, Section};
pub use form::{FormError, FormState, FormStore};
pub use payload::{normalize, Payload};
pub use risk::{score_label, FailureKind, Prediction, RiskLevel, SubmissionResult};
pub use value::{parse_number, FieldValue};
