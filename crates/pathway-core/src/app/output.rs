//! Pipeline output and the single-writer fold that produces it.

use serde::Serialize;
use tracing::warn;

use crate::domain::{
    PatientFailure, PatientId, PatientRecord, RunId, StratificationKey, Transition, Visit, Warning,
};
use crate::engine::PatientOutcome;
use crate::graph::GraphRegistry;
use crate::observability::RunSummary;
use crate::validate::validate_patient;

/// Per-patient derived data, for audit and downstream formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientReport {
    pub patient_id: PatientId,
    pub initial_key: Option<StratificationKey>,
    pub visits: Vec<Visit>,
    pub transitions: Vec<Transition>,
    pub grade_defaulted: bool,
    pub failed: bool,
}

/// Everything a run produces.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub run_id: RunId,
    pub graphs: GraphRegistry,
    pub patients: Vec<PatientReport>,
    pub errors: Vec<PatientFailure>,
    pub warnings: Vec<Warning>,
    pub summary: RunSummary,
}

/// Fold per-patient outcomes, in input order, into the run output.
///
/// `records` and `outcomes` are parallel slices.
pub(crate) fn fold_outcomes(
    run_id: RunId,
    records: &[PatientRecord],
    outcomes: Vec<PatientOutcome>,
) -> PipelineOutput {
    let mut graphs = GraphRegistry::new();
    let mut patients = Vec::with_capacity(outcomes.len());
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut summary = RunSummary {
        patients: outcomes.len(),
        ..RunSummary::default()
    };

    for (record, outcome) in records.iter().zip(outcomes) {
        let checks = validate_patient(record, &outcome);
        for w in &checks {
            warn!(%run_id, warning = %w, "validation warning");
        }

        graphs.extend(&outcome.transitions);
        for observation in &outcome.observations {
            graphs.add_observation(observation);
        }

        summary.raw_transitions += outcome.transitions.len();
        summary.cross_graph_transitions += outcome
            .transitions
            .iter()
            .filter(|t| t.is_cross_graph)
            .count();
        if outcome.grade_defaulted {
            summary.patients_grade_defaulted += 1;
        }

        let PatientOutcome {
            patient_id,
            initial_key,
            visits,
            transitions,
            warnings: imputation_warnings,
            failure,
            grade_defaulted,
            ..
        } = outcome;

        warnings.extend(imputation_warnings);
        warnings.extend(checks);

        let failed = failure.is_some();
        if let Some(failure) = failure {
            summary.patients_failed += 1;
            errors.push(failure);
        }

        patients.push(PatientReport {
            patient_id,
            initial_key,
            visits,
            transitions,
            grade_defaulted,
            failed,
        });
    }

    summary.distinct_edges = graphs.edge_count();
    summary.populated_graphs = graphs.populated_count();
    summary.warnings = warnings.len();

    PipelineOutput {
        run_id,
        graphs,
        patients,
        errors,
        warnings,
        summary,
    }
}
