//! Validator: a read-only consistency pass over built transitions and timelines.
//!
//! Produces advisory warnings only. Nothing here changes a transition or a visit.

use crate::domain::{
    PatientId, PatientRecord, Transition, TreatmentPhase, TumorSize, Visit, Warning, WarningKind,
};
use crate::engine::PatientOutcome;

/// Checks on single transitions.
pub fn check_transition(transition: &Transition) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let from = transition.from_state;
    let to = transition.to_state;
    let action = transition.action;
    let at = |detail| {
        Warning::at_visit(transition.patient_id.clone(), transition.from_visit, detail)
    };

    if !action.is_available_in(from.phase) {
        warnings.push(at(WarningKind::ActionUnavailable {
            action,
            phase: from.phase,
        }));
    }

    if action.is_surgical()
        && !matches!(
            to.phase,
            TreatmentPhase::EarlyPostop | TreatmentPhase::Recurrent
        )
    {
        warnings.push(at(WarningKind::SurgeryWithoutPostop {
            action,
            to_phase: to.phase,
        }));
    }

    if from.size == TumorSize::Large && to.size == TumorSize::Small && !action.is_surgical() {
        warnings.push(at(WarningKind::SizeDropWithoutSurgery {
            from: from.size,
            to: to.size,
            action,
        }));
    }

    if from.phase == TreatmentPhase::Naive
        && matches!(
            to.phase,
            TreatmentPhase::LatePostop | TreatmentPhase::LatePostrad
        )
    {
        warnings.push(at(WarningKind::PhaseSkip {
            from: from.phase,
            to: to.phase,
        }));
    }

    warnings
}

pub fn check_transitions(transitions: &[Transition]) -> Vec<Warning> {
    transitions.iter().flat_map(check_transition).collect()
}

/// Timestamps of the raw record must strictly increase.
///
/// Runs on the record, so it also covers patients whose processing halted.
/// Visits without a resolvable time are skipped.
pub fn check_timestamps(record: &PatientRecord) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let mut previous: Option<f64> = None;
    for (index, visit) in record.visits.iter().enumerate() {
        let Some(months) = visit.months(record.diagnosis_date) else {
            continue;
        };
        match previous {
            Some(previous_months) if months <= previous_months => {
                warnings.push(Warning::at_visit(
                    record.patient_id.clone(),
                    index,
                    WarningKind::NonMonotonicTimestamp {
                        previous_months,
                        months,
                    },
                ));
            }
            _ => {}
        }
        previous = Some(months);
    }
    warnings
}

/// Recurrence must be preceded by some treated phase.
pub fn check_recurrence(patient_id: &PatientId, visits: &[Visit]) -> Vec<Warning> {
    let Some(first_recurrent) = visits.iter().position(|v| v.phase.is_terminal()) else {
        return Vec::new();
    };
    let treated_before = visits[..first_recurrent]
        .iter()
        .any(|v| v.phase.is_treated());
    if treated_before {
        return Vec::new();
    }
    vec![Warning::at_visit(
        patient_id.clone(),
        visits[first_recurrent].index(),
        WarningKind::RecurrenceWithoutTreatment,
    )]
}

/// Every check for one patient.
pub fn validate_patient(record: &PatientRecord, outcome: &PatientOutcome) -> Vec<Warning> {
    let mut warnings = check_transitions(&outcome.transitions);
    warnings.extend(check_timestamps(record));
    warnings.extend(check_recurrence(&outcome.patient_id, &outcome.visits));
    warnings
}
