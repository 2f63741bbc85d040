//! Field registry for the risk assessment form.
//!
//! The scoring service expects exactly these 26 fields, spelled exactly as
//! listed here. Order follows the service's input schema.

use serde::{Deserialize, Serialize};

/// Semantic kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Decimal value typed by the user, kept as text while edited
    NumericText,
    /// 0/1 value chosen through a two-option control
    BinaryFlag,
    /// One 0/1 member of a mutually exclusive group
    CategoricalGroup(Group),
}

/// Mutually exclusive flag groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    Smoking,
    Activity,
    Diet,
    Stress,
}

/// Form section a field is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    BasicInfo,
    Vitals,
    Ecg,
    Lifestyle,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::BasicInfo,
        Section::Vitals,
        Section::Ecg,
        Section::Lifestyle,
    ];

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Info",
            Self::Vitals => "Vitals",
            Self::Ecg => "ECG",
            Self::Lifestyle => "Lifestyle",
        }
    }
}

/// Initial value of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Empty,
    Flag(u8),
}

/// One registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: DefaultValue,
    pub label: &'static str,
    pub hint: &'static str,
    pub section: Section,
}

pub const AGE: &str = "age";
pub const SYSTOLIC_BP: &str = "Systolic_BP_mmHg";
pub const DIASTOLIC_BP: &str = "Diastolic_BP_mmHg";
pub const HEART_RATE: &str = "Heart_Rate_bpm";
pub const SPO2: &str = "Blood_Oxygen_Level_SpO2_percent";
pub const TEMPERATURE: &str = "Temperature_C";
pub const HEIGHT: &str = "height_cm";
pub const WEIGHT: &str = "weight_kg";
pub const BMI: &str = "BMI_kg_per_m2";
pub const ECG_HEART_RATE: &str = "ecg_heart_rate_bpm";
pub const ECG_QRS_DURATION: &str = "ecg_qrs_duration_ms";
pub const ECG_ST_DEVIATION: &str = "ecg_st_deviation_mV";
pub const ECG_R_PEAK: &str = "ecg_r_peak_mV";
pub const ECG_ABNORMAL: &str = "ecg_abnormal";
pub const BLOOD_SUGAR: &str = "blood_sugar_mg_dL";
pub const FAMILY_HISTORY: &str = "family_history";
pub const SEX: &str = "sex_encoded";
pub const ECG_LABEL: &str = "ecg_label_encoded";
pub const SMOKING_FORMER: &str = "smoking_status_Former";
pub const SMOKING_NEVER: &str = "smoking_status_Never";
pub const ACTIVITY_LOW: &str = "physical_activity_level_Low";
pub const ACTIVITY_MEDIUM: &str = "physical_activity_level_Medium";
pub const DIET_GOOD: &str = "diet_quality_Good";
pub const DIET_POOR: &str = "diet_quality_Poor";
pub const STRESS_LOW: &str = "stress_level_Low";
pub const STRESS_MEDIUM: &str = "stress_level_Medium";

/// Number of fields the scoring service expects.
pub const FIELD_COUNT: usize = 26;

const fn numeric(
    name: &'static str,
    label: &'static str,
    hint: &'static str,
    section: Section,
) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::NumericText,
        default: DefaultValue::Empty,
        label,
        hint,
        section,
    }
}

const fn flag(name: &'static str, label: &'static str, default: u8, section: Section) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::BinaryFlag,
        default: DefaultValue::Flag(default),
        label,
        hint: "0/1",
        section,
    }
}

const fn member(name: &'static str, label: &'static str, group: Group, default: u8) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::CategoricalGroup(group),
        default: DefaultValue::Flag(default),
        label,
        hint: "0/1",
        section: Section::Lifestyle,
    }
}

static REGISTRY: [FieldSpec; FIELD_COUNT] = [
    numeric(AGE, "Age", "years", Section::BasicInfo),
    numeric(SYSTOLIC_BP, "Systolic BP", "mmHg", Section::Vitals),
    numeric(DIASTOLIC_BP, "Diastolic BP", "mmHg", Section::Vitals),
    numeric(HEART_RATE, "Heart Rate", "bpm", Section::Vitals),
    numeric(SPO2, "SpO2", "%", Section::Vitals),
    numeric(TEMPERATURE, "Temperature", "°C", Section::Vitals),
    numeric(HEIGHT, "Height", "cm", Section::BasicInfo),
    numeric(WEIGHT, "Weight", "kg", Section::BasicInfo),
    numeric(BMI, "BMI (auto)", "kg/m²", Section::BasicInfo),
    numeric(ECG_HEART_RATE, "ECG Heart Rate", "bpm", Section::Ecg),
    numeric(ECG_QRS_DURATION, "QRS Duration", "ms", Section::Ecg),
    numeric(ECG_ST_DEVIATION, "ST Deviation", "mV", Section::Ecg),
    numeric(ECG_R_PEAK, "R Peak", "mV", Section::Ecg),
    flag(ECG_ABNORMAL, "ECG Abnormal", 0, Section::Ecg),
    numeric(BLOOD_SUGAR, "Blood Sugar", "mg/dL", Section::Vitals),
    flag(FAMILY_HISTORY, "Family History", 0, Section::BasicInfo),
    flag(SEX, "Sex", 1, Section::BasicInfo),
    flag(ECG_LABEL, "ECG Label", 0, Section::Ecg),
    member(SMOKING_FORMER, "Smoking: Former", Group::Smoking, 0),
    member(SMOKING_NEVER, "Smoking: Never", Group::Smoking, 1),
    member(ACTIVITY_LOW, "Activity: Low", Group::Activity, 0),
    member(ACTIVITY_MEDIUM, "Activity: Medium", Group::Activity, 1),
    member(DIET_GOOD, "Diet: Good", Group::Diet, 0),
    member(DIET_POOR, "Diet: Poor", Group::Diet, 1),
    member(STRESS_LOW, "Stress: Low", Group::Stress, 0),
    member(STRESS_MEDIUM, "Stress: Medium", Group::Stress, 1),
];

/// All registered fields in schema order.
#[must_use]
pub fn all() -> &'static [FieldSpec] {
    &REGISTRY
}

/// Look up a field by its wire name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static FieldSpec> {
    REGISTRY.iter().find(|spec| spec.name == name)
}

/// Position of a field in schema order.
#[must_use]
pub fn index_of(name: &str) -> Option<usize> {
    REGISTRY.iter().position(|spec| spec.name == name)
}

/// Fields shown in one form section, in schema order.
pub fn in_section(section: Section) -> impl Iterator<Item = &'static FieldSpec> {
    REGISTRY.iter().filter(move |spec| spec.section == section)
}

/// Names of the fields belonging to a categorical group.
pub fn group_members(group: Group) -> impl Iterator<Item = &'static str> {
    REGISTRY
        .iter()
        .filter(move |spec| spec.kind == FieldKind::CategoricalGroup(group))
        .map(|spec| spec.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_has_unique_names() {
        let names: HashSet<&str> = all().iter().map(|s| s.name).collect();
        assert_eq!(names.len(), FIELD_COUNT);
    }

    #[test]
    fn test_kind_counts() {
        let numeric = all()
            .iter()
            .filter(|s| s.kind == FieldKind::NumericText)
            .count();
        let flags = all()
            .iter()
            .filter(|s| s.kind == FieldKind::BinaryFlag)
            .count();
        assert_eq!(numeric, 14);
        assert_eq!(flags, 4);
        assert_eq!(FIELD_COUNT - numeric - flags, 8);
    }

    #[test]
    fn test_group_defaults_have_exactly_one_set() {
        for group in [Group::Smoking, Group::Activity, Group::Diet, Group::Stress] {
            let set = group_members(group)
                .filter_map(lookup)
                .filter(|s| s.default == DefaultValue::Flag(1))
                .count();
            assert_eq!(set, 1, "{group:?}");
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup(SEX).map(|s| s.default), Some(DefaultValue::Flag(1)));
        assert_eq!(index_of(AGE), Some(0));
        assert!(lookup("cholesterol").is_none());
    }

    #[test]
    fn test_sections_partition_registry() {
        let total: usize = Section::ALL.iter().map(|s| in_section(*s).count()).sum();
        assert_eq!(total, FIELD_COUNT);
        assert!(in_section(Section::Lifestyle)
            .all(|s| matches!(s.kind, FieldKind::CategoricalGroup(_))));
    }
}
