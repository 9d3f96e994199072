//! Raw transitions: one per consecutive visit pair, before aggregation.

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::ids::PatientId;
use super::state::{StateId, TreatmentPhase};
use super::strata::{StratificationFactor, StratificationKey};

/// Clinical outcome of one step, derived from the two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionOutcome {
    Stable,
    Progression,
    Regression,
    Recurrence,
}

impl TransitionOutcome {
    pub fn between(from: &StateId, to: &StateId) -> Self {
        if to.phase == TreatmentPhase::Recurrent && from.phase != TreatmentPhase::Recurrent {
            TransitionOutcome::Recurrence
        } else if to.size > from.size {
            TransitionOutcome::Progression
        } else if to.size < from.size {
            TransitionOutcome::Regression
        } else {
            TransitionOutcome::Stable
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransitionOutcome::Stable => "stable",
            TransitionOutcome::Progression => "progression",
            TransitionOutcome::Regression => "regression",
            TransitionOutcome::Recurrence => "recurrence",
        }
    }
}

/// One observed (state, action, state) step of one patient.
///
/// `from_graph` is the key that was current at the from-visit. It is never
/// rewritten when a later step changes the patient's key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub patient_id: PatientId,
    /// Input index of the from-visit.
    pub from_visit: usize,

    pub from_graph: StratificationKey,
    pub from_state: StateId,
    pub action: Action,
    pub to_graph: StratificationKey,
    pub to_state: StateId,

    pub elapsed_months: f64,
    pub is_cross_graph: bool,
    pub changed_factors: Vec<StratificationFactor>,
    pub outcome: TransitionOutcome,
}

/// One visit observed in the graph that was current for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeObservation {
    pub patient_id: PatientId,
    pub graph: StratificationKey,
    pub state: StateId,
}
