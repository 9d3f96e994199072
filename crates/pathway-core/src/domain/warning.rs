//! Advisory warnings attached to the pipeline output.
//!
//! Warnings never halt processing. Imputation raises some of them while it
//! runs; the validator raises the rest in a read-only pass afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::errors::ErrorKind;
use super::ids::PatientId;
use super::state::{TreatmentPhase, TumorSize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarningKind {
    /// A post-surgery measurement exceeded the pre-surgery size and was capped.
    ContradictorySize {
        pre_surgery_cm: f64,
        measured_cm: f64,
        capped_cm: f64,
    },

    /// Interval too short for a reliable growth velocity; previous value carried forward.
    IntervalTooShort { interval_months: f64 },

    /// The step's action is not available in the from-state's phase.
    ActionUnavailable {
        action: Action,
        phase: TreatmentPhase,
    },

    /// A surgical action did not lead to `early_postop`.
    SurgeryWithoutPostop {
        action: Action,
        to_phase: TreatmentPhase,
    },

    /// The tumor shrank from large to small without a surgical action.
    SizeDropWithoutSurgery {
        from: TumorSize,
        to: TumorSize,
        action: Action,
    },

    /// Visit timestamps are not strictly increasing.
    NonMonotonicTimestamp { previous_months: f64, months: f64 },

    /// A phase was skipped (e.g. `naive` directly to `late_postop`).
    PhaseSkip {
        from: TreatmentPhase,
        to: TreatmentPhase,
    },

    /// Recurrence was flagged with no treatment phase earlier in the timeline.
    RecurrenceWithoutTreatment,
}

impl WarningKind {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Recoverable
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::ContradictorySize {
                pre_surgery_cm,
                measured_cm,
                capped_cm,
            } => write!(
                f,
                "post-surgery size {measured_cm} cm exceeds pre-surgery {pre_surgery_cm} cm, capped at {capped_cm} cm"
            ),
            WarningKind::IntervalTooShort { interval_months } => write!(
                f,
                "interval of {interval_months} months too short for growth velocity, previous value kept"
            ),
            WarningKind::ActionUnavailable { action, phase } => {
                write!(f, "action {action} unavailable in phase {}", phase.as_str())
            }
            WarningKind::SurgeryWithoutPostop { action, to_phase } => write!(
                f,
                "{action} led to {} instead of early_postop",
                to_phase.as_str()
            ),
            WarningKind::SizeDropWithoutSurgery { from, to, action } => write!(
                f,
                "size {} -> {} under {action} without surgery",
                from.as_str(),
                to.as_str()
            ),
            WarningKind::NonMonotonicTimestamp {
                previous_months,
                months,
            } => write!(
                f,
                "visit at {months} months follows visit at {previous_months} months"
            ),
            WarningKind::PhaseSkip { from, to } => {
                write!(f, "phase skipped from {} to {}", from.as_str(), to.as_str())
            }
            WarningKind::RecurrenceWithoutTreatment => {
                f.write_str("recurrence flagged with no prior treatment")
            }
        }
    }
}

/// One warning, located at a patient and (usually) a visit index.
///
/// For transition warnings `visit_index` is the index of the step's from-visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub patient_id: PatientId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_index: Option<usize>,
    pub detail: WarningKind,
}

impl Warning {
    pub fn at_visit(patient_id: PatientId, visit_index: usize, detail: WarningKind) -> Self {
        Self {
            patient_id,
            visit_index: Some(visit_index),
            detail,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.visit_index {
            Some(i) => write!(f, "[{} visit {i}] {}", self.patient_id, self.detail),
            None => write!(f, "[{}] {}", self.patient_id, self.detail),
        }
    }
}
