//! Actions and the per-phase action-availability table.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::TreatmentPhase;

/// One of the eight clinical decisions taken between two visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SurgeryGtr,
    SurgeryStr,
    RadiationSrs,
    RadiationFsrt,
    SupportiveCare,
    /// Next visit in under 4.5 months.
    ObserveShort,
    /// Next visit in 4.5 to 9 months.
    ObserveMedium,
    /// Next visit in 9 months or more.
    ObserveLong,
}

const ALL_ACTIONS: &[Action] = &[
    Action::SurgeryGtr,
    Action::SurgeryStr,
    Action::RadiationSrs,
    Action::RadiationFsrt,
    Action::SupportiveCare,
    Action::ObserveShort,
    Action::ObserveMedium,
    Action::ObserveLong,
];

const EARLY_POSTOP_ACTIONS: &[Action] = &[
    Action::RadiationSrs,
    Action::RadiationFsrt,
    Action::SupportiveCare,
    Action::ObserveShort,
    Action::ObserveMedium,
    Action::ObserveLong,
];

const EARLY_POSTRAD_ACTIONS: &[Action] = &[
    Action::SupportiveCare,
    Action::ObserveShort,
    Action::ObserveMedium,
    Action::ObserveLong,
];

const LATE_POSTRAD_ACTIONS: &[Action] = &[
    Action::SurgeryGtr,
    Action::SurgeryStr,
    Action::RadiationFsrt,
    Action::SupportiveCare,
    Action::ObserveShort,
    Action::ObserveMedium,
    Action::ObserveLong,
];

impl Action {
    pub const ALL: &'static [Action] = ALL_ACTIONS;

    pub fn as_str(self) -> &'static str {
        match self {
            Action::SurgeryGtr => "surgery_gtr",
            Action::SurgeryStr => "surgery_str",
            Action::RadiationSrs => "radiation_srs",
            Action::RadiationFsrt => "radiation_fsrt",
            Action::SupportiveCare => "supportive_care",
            Action::ObserveShort => "observe_short",
            Action::ObserveMedium => "observe_medium",
            Action::ObserveLong => "observe_long",
        }
    }

    pub fn is_surgical(self) -> bool {
        matches!(self, Action::SurgeryGtr | Action::SurgeryStr)
    }

    /// Actions available from a state, as a pure function of its phase.
    pub fn available_in(phase: TreatmentPhase) -> &'static [Action] {
        match phase {
            TreatmentPhase::Naive => ALL_ACTIONS,
            TreatmentPhase::EarlyPostop => EARLY_POSTOP_ACTIONS,
            TreatmentPhase::LatePostop => ALL_ACTIONS,
            TreatmentPhase::EarlyPostrad => EARLY_POSTRAD_ACTIONS,
            TreatmentPhase::LatePostrad => LATE_POSTRAD_ACTIONS,
            TreatmentPhase::Recurrent => ALL_ACTIONS,
        }
    }

    pub fn is_available_in(self, phase: TreatmentPhase) -> bool {
        Self::available_in(phase).contains(&self)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extent of a surgical resection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurgeryKind {
    /// Gross total resection (Simpson I-III).
    Gtr,
    /// Subtotal resection (Simpson IV-V).
    Str,
}

impl SurgeryKind {
    pub fn action(self) -> Action {
        match self {
            SurgeryKind::Gtr => Action::SurgeryGtr,
            SurgeryKind::Str => Action::SurgeryStr,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiationKind {
    /// Single-session stereotactic radiosurgery.
    Srs,
    /// Fractionated stereotactic radiotherapy.
    Fsrt,
}

impl RadiationKind {
    pub fn action(self) -> Action {
        match self {
            RadiationKind::Srs => Action::RadiationSrs,
            RadiationKind::Fsrt => Action::RadiationFsrt,
        }
    }
}
