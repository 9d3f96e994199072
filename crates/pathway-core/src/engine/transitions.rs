//! Transition builder: consecutive visit pairs into raw (state, action, state) edges.
//!
//! The patient's stratification key is threaded through the pairs as a value.
//! A grade change between visit i and i+1 produces a cross-graph transition
//! and a new key for the following pairs; transitions already built keep the
//! key that was current when they were built.

use tracing::debug;

use super::assemble::{assemble_action, assemble_state};
use crate::domain::{
    NodeObservation, PatientId, StratificationKey, Transition, TransitionOutcome, Visit,
};

/// Raw (not yet deduplicated) output for one patient.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientTransitions {
    pub transitions: Vec<Transition>,
    pub observations: Vec<NodeObservation>,
}

/// Build one transition for the pair `(from, to)` and return the key for the next pair.
pub fn build_step(
    patient_id: &PatientId,
    key: StratificationKey,
    from: &Visit,
    to: &Visit,
) -> (Transition, StratificationKey) {
    let to_graph = if to.grade() != key.grade {
        key.with_grade(to.grade())
    } else {
        key
    };
    let from_state = assemble_state(from);
    let to_state = assemble_state(to);
    let changed_factors = key.changed_factors(&to_graph);

    let transition = Transition {
        patient_id: patient_id.clone(),
        from_visit: from.index(),
        from_graph: key,
        from_state,
        action: assemble_action(from, to),
        to_graph,
        to_state,
        elapsed_months: to.months() - from.months(),
        is_cross_graph: !changed_factors.is_empty(),
        changed_factors,
        outcome: TransitionOutcome::between(&from_state, &to_state),
    };
    (transition, to_graph)
}

/// Build every transition of one patient's derived visits.
///
/// `initial_key` must carry the grade of the first visit.
pub fn build_transitions(
    patient_id: &PatientId,
    initial_key: StratificationKey,
    visits: &[Visit],
) -> PatientTransitions {
    let Some(first) = visits.first() else {
        return PatientTransitions::default();
    };

    let mut out = PatientTransitions {
        transitions: Vec::with_capacity(visits.len().saturating_sub(1)),
        observations: Vec::with_capacity(visits.len()),
    };
    out.observations.push(NodeObservation {
        patient_id: patient_id.clone(),
        graph: initial_key,
        state: assemble_state(first),
    });

    let mut key = initial_key;
    for pair in visits.windows(2) {
        let (transition, next_key) = build_step(patient_id, key, &pair[0], &pair[1]);
        if transition.is_cross_graph {
            debug!(
                patient = %patient_id,
                from = %transition.from_graph,
                to = %transition.to_graph,
                "cross-graph transition"
            );
        }
        out.observations.push(NodeObservation {
            patient_id: patient_id.clone(),
            graph: next_key,
            state: transition.to_state,
        });
        out.transitions.push(transition);
        key = next_key;
    }
    out
}
