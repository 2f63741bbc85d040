//! Exclusive choices and their flat 0/1 encoding.
//!
//! Each two-option control is a tagged enum. The scoring service only knows
//! the flattened flag fields, so a choice is turned into a full patch (every
//! sibling flag assigned) right before it reaches the form store.

use super::fields;
use super::value::FieldValue;

/// Assignments applied atomically by `FormStore::apply_group_choice`.
pub type GroupPatch = Vec<(&'static str, FieldValue)>;

/// A selection that maps onto one or more flag fields.
pub trait ExclusiveChoice: Copy {
    /// Full set of flag assignments for this selection.
    fn patch(self) -> GroupPatch;
}

macro_rules! binary_choice {
    ($(#[$doc:meta])* $name:ident, $field:expr, $on:ident => 1, $off:ident => 0) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $on,
            $off,
        }

        impl ExclusiveChoice for $name {
            fn patch(self) -> GroupPatch {
                let flag = match self {
                    Self::$on => 1,
                    Self::$off => 0,
                };
                vec![($field, FieldValue::Flag(flag))]
            }
        }
    };
}

macro_rules! group_choice {
    (
        $(#[$doc:meta])*
        $name:ident,
        $first:ident => $first_field:expr,
        $second:ident => $second_field:expr
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $first,
            $second,
        }

        impl ExclusiveChoice for $name {
            fn patch(self) -> GroupPatch {
                let (a, b) = match self {
                    Self::$first => (1, 0),
                    Self::$second => (0, 1),
                };
                vec![
                    ($first_field, FieldValue::Flag(a)),
                    ($second_field, FieldValue::Flag(b)),
                ]
            }
        }
    };
}

binary_choice!(
    /// Encoded as `sex_encoded`: male = 1.
    Sex, fields::SEX, Male => 1, Female => 0
);
binary_choice!(FamilyHistory, fields::FAMILY_HISTORY, Yes => 1, No => 0);
binary_choice!(EcgLabel, fields::ECG_LABEL, Abnormal => 1, Normal => 0);
binary_choice!(EcgAbnormal, fields::ECG_ABNORMAL, Yes => 1, No => 0);

group_choice!(
    Smoking,
    Former => fields::SMOKING_FORMER,
    Never => fields::SMOKING_NEVER
);
group_choice!(
    ActivityLevel,
    Low => fields::ACTIVITY_LOW,
    Medium => fields::ACTIVITY_MEDIUM
);
group_choice!(
    DietQuality,
    Good => fields::DIET_GOOD,
    Poor => fields::DIET_POOR
);
group_choice!(
    StressLevel,
    Low => fields::STRESS_LOW,
    Medium => fields::STRESS_MEDIUM
);

/// Choice controls shown on the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Sex,
    FamilyHistory,
    EcgLabel,
    EcgAbnormal,
    Smoking,
    Activity,
    Diet,
    Stress,
}

impl Control {
    pub const ALL: [Control; 8] = [
        Control::Sex,
        Control::FamilyHistory,
        Control::EcgLabel,
        Control::EcgAbnormal,
        Control::Smoking,
        Control::Activity,
        Control::Diet,
        Control::Stress,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sex => "Sex",
            Self::FamilyHistory => "Family History",
            Self::EcgLabel => "ECG Label",
            Self::EcgAbnormal => "ECG Abnormal",
            Self::Smoking => "Smoking",
            Self::Activity => "Physical Activity",
            Self::Diet => "Diet Quality",
            Self::Stress => "Stress Level",
        }
    }

    #[must_use]
    pub fn section(&self) -> fields::Section {
        match self {
            Self::Sex | Self::FamilyHistory => fields::Section::BasicInfo,
            Self::EcgLabel | Self::EcgAbnormal => fields::Section::Ecg,
            Self::Smoking | Self::Activity | Self::Diet | Self::Stress => {
                fields::Section::Lifestyle
            }
        }
    }

    /// Option labels; index 0 and 1 are accepted by [`Control::patch`].
    #[must_use]
    pub fn options(&self) -> [&'static str; 2] {
        match self {
            Self::Sex => ["Male", "Female"],
            Self::FamilyHistory => ["Yes", "No"],
            Self::EcgLabel => ["Normal", "Abnormal"],
            Self::EcgAbnormal => ["No", "Yes"],
            Self::Smoking => ["Former", "Never"],
            Self::Activity => ["Low", "Medium"],
            Self::Diet => ["Good", "Poor"],
            Self::Stress => ["Low", "Medium"],
        }
    }

    /// Patch for the option at `index` (0 or 1; anything else picks 1).
    #[must_use]
    pub fn patch(&self, index: usize) -> GroupPatch {
        let first = index == 0;
        match self {
            Self::Sex => pick(first, Sex::Male, Sex::Female),
            Self::FamilyHistory => pick(first, FamilyHistory::Yes, FamilyHistory::No),
            Self::EcgLabel => pick(first, EcgLabel::Normal, EcgLabel::Abnormal),
            Self::EcgAbnormal => pick(first, EcgAbnormal::No, EcgAbnormal::Yes),
            Self::Smoking => pick(first, Smoking::Former, Smoking::Never),
            Self::Activity => pick(first, ActivityLevel::Low, ActivityLevel::Medium),
            Self::Diet => pick(first, DietQuality::Good, DietQuality::Poor),
            Self::Stress => pick(first, StressLevel::Low, StressLevel::Medium),
        }
    }

    /// Index of the option the given field lookup currently encodes.
    ///
    /// `None` when the flags match neither option (e.g. a sibling pair that
    /// was set by hand to both 0).
    pub fn selected<F>(&self, mut value_of: F) -> Option<usize>
    where
        F: FnMut(&str) -> Option<FieldValue>,
    {
        (0..2).find(|&i| {
            self.patch(i)
                .iter()
                .all(|(name, want)| value_of(name).and_then(|v| v.as_number()) == want.as_number())
        })
    }
}

fn pick<C: ExclusiveChoice>(first: bool, a: C, b: C) -> GroupPatch {
    if first {
        a.patch()
    } else {
        b.patch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_patch_covers_siblings() {
        let patch = Smoking::Former.patch();
        assert_eq!(
            patch,
            vec![
                (fields::SMOKING_FORMER, FieldValue::Flag(1)),
                (fields::SMOKING_NEVER, FieldValue::Flag(0)),
            ]
        );
    }

    #[test]
    fn test_binary_choice_encoding() {
        assert_eq!(Sex::Male.patch(), vec![(fields::SEX, FieldValue::Flag(1))]);
        assert_eq!(Sex::Female.patch(), vec![(fields::SEX, FieldValue::Flag(0))]);
        assert_eq!(
            EcgAbnormal::Yes.patch(),
            vec![(fields::ECG_ABNORMAL, FieldValue::Flag(1))]
        );
    }

    #[test]
    fn test_every_control_patch_targets_registered_fields() {
        for control in Control::ALL {
            for i in 0..2 {
                for (name, _) in control.patch(i) {
                    let spec = fields::lookup(name).expect("Registered field");
                    assert_eq!(spec.section, control.section(), "{name}");
                }
            }
        }
    }

    #[test]
    fn test_selected_reads_back_patch() {
        for control in Control::ALL {
            for i in 0..2 {
                let patch = control.patch(i);
                let selected = control.selected(|name| {
                    patch
                        .iter()
                        .find(|(n, _)| *n == name)
                        .map(|(_, v)| v.clone())
                });
                assert_eq!(selected, Some(i), "{control:?}");
            }
        }
    }
}
