//! Engine - 患者単位の処理
//!
//! # 処理順
//! 1. 層別因子の分類（gender は必須, 失敗は fatal）
//! 2. サイズ/症状/grade の補完（`impute`）
//! 3. 治療フェーズの付与（`assign_phases`）
//! 4. 連続する受診ペアから遷移を生成（`build_transitions`）
//!
//! 患者同士は独立で、共有状態には触れません。

pub mod assemble;
pub mod impute;
pub mod phase;
pub mod transitions;

pub use assemble::{assemble_action, assemble_state};
pub use impute::{ImputedTimeline, impute};
pub use phase::{PhaseTracker, assign_phases, derive_phase};
pub use transitions::{PatientTransitions, build_step, build_transitions};

use tracing::{debug, error};

use crate::classify::{classify_age, classify_gender, classify_location};
use crate::config::PipelineConfig;
use crate::domain::{
    GradeSource, NodeObservation, PatientError, PatientFailure, PatientId, PatientRecord,
    StratificationKey, Transition, Visit, Warning,
};

/// Everything one patient contributes to a run.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientOutcome {
    pub patient_id: PatientId,
    /// Key as of the first visit; `None` when the patient failed before any visit.
    pub initial_key: Option<StratificationKey>,
    pub visits: Vec<Visit>,
    pub transitions: Vec<Transition>,
    pub observations: Vec<NodeObservation>,
    pub warnings: Vec<Warning>,
    pub failure: Option<PatientFailure>,
    /// At least one visit's grade came from the `grade_1` assumption.
    pub grade_defaulted: bool,
}

impl PatientOutcome {
    fn failed(patient_id: PatientId, error: PatientError) -> Self {
        Self {
            failure: Some(PatientFailure::new(patient_id.clone(), error)),
            ..Self::empty(patient_id)
        }
    }

    fn empty(patient_id: PatientId) -> Self {
        Self {
            patient_id,
            initial_key: None,
            visits: Vec::new(),
            transitions: Vec::new(),
            observations: Vec::new(),
            warnings: Vec::new(),
            failure: None,
            grade_defaulted: false,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Run the full per-patient stage for one record.
pub fn process_patient(record: &PatientRecord, config: &PipelineConfig) -> PatientOutcome {
    let patient_id = record.patient_id.clone();

    let gender = match classify_gender(&record.gender) {
        Ok(gender) => gender,
        Err(err) => {
            error!(patient = %patient_id, error = %err, "patient rejected");
            return PatientOutcome::failed(patient_id, err);
        }
    };
    let age = classify_age(record.age_at_diagnosis);
    let location = classify_location(record.location.as_deref());

    let timeline = match impute(record, config) {
        Ok(timeline) => timeline,
        Err(err) => {
            error!(patient = %patient_id, error = %err, "patient rejected");
            return PatientOutcome::failed(patient_id, err);
        }
    };

    let ImputedTimeline {
        visits,
        warnings,
        halted,
    } = timeline;

    let visits = assign_phases(visits, config);
    let Some(first) = visits.first() else {
        debug!(patient = %patient_id, "no visits");
        return PatientOutcome {
            warnings,
            ..PatientOutcome::empty(patient_id)
        };
    };

    let initial_key = StratificationKey::new(age, gender, first.grade(), location);
    let built = build_transitions(&patient_id, initial_key, &visits);
    let grade_defaulted = visits
        .iter()
        .any(|v| v.observed.grade_source == GradeSource::Defaulted);

    let failure = halted.map(|err| {
        error!(
            patient = %patient_id,
            error = %err,
            kept_visits = visits.len(),
            "patient timeline truncated"
        );
        PatientFailure::new(patient_id.clone(), err)
    });

    debug!(
        patient = %patient_id,
        visits = visits.len(),
        transitions = built.transitions.len(),
        "patient processed"
    );

    PatientOutcome {
        patient_id,
        initial_key: Some(initial_key),
        visits,
        transitions: built.transitions,
        observations: built.observations,
        warnings,
        failure,
        grade_defaulted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Gender, Grade, Location, RawVisit};

    fn record(gender: &str, visits: Vec<RawVisit>) -> PatientRecord {
        PatientRecord {
            patient_id: PatientId::new("P1"),
            age_at_diagnosis: 58.0,
            gender: gender.to_string(),
            location: Some("left parasagittal".to_string()),
            diagnosis_date: None,
            visits,
        }
    }

    #[test]
    fn static_fields_form_the_initial_key() {
        let rec = record(
            "female",
            vec![
                RawVisit::at(0.0).with_size(2.0),
                RawVisit::at(6.0).with_size(2.1),
            ],
        );
        let outcome = process_patient(&rec, &PipelineConfig::default());

        let key = outcome.initial_key.unwrap();
        assert_eq!(key.gender, Gender::Female);
        assert_eq!(key.location, Location::Parasagittal);
        assert_eq!(key.grade, Grade::Grade1);
        assert!(outcome.grade_defaulted);
        assert_eq!(outcome.transitions.len(), 1);
        assert!(!outcome.is_failed());
    }

    #[test]
    fn unrecognized_gender_is_fatal() {
        let rec = record("unknown", vec![RawVisit::at(0.0).with_size(2.0)]);
        let outcome = process_patient(&rec, &PipelineConfig::default());

        assert!(outcome.transitions.is_empty());
        let failure = outcome.failure.unwrap();
        assert!(matches!(
            failure.error,
            PatientError::UnrecognizedCategory { ref field, .. } if field == "gender"
        ));
    }

    #[test]
    fn missing_baseline_contributes_nothing() {
        let rec = record(
            "M",
            vec![RawVisit::at(0.0), RawVisit::at(6.0).with_size(3.0)],
        );
        let outcome = process_patient(&rec, &PipelineConfig::default());

        assert!(outcome.transitions.is_empty());
        assert!(outcome.observations.is_empty());
        assert_eq!(
            outcome.failure.unwrap().error,
            PatientError::MissingBaseline
        );
    }

    #[test]
    fn non_positive_interval_keeps_the_prefix() {
        let rec = record(
            "M",
            vec![
                RawVisit::at(0.0).with_size(2.0),
                RawVisit::at(6.0).with_size(2.0),
                RawVisit::at(12.0).with_size(2.0),
                RawVisit::at(12.0).with_size(2.0),
            ],
        );
        let outcome = process_patient(&rec, &PipelineConfig::default());

        assert_eq!(outcome.visits.len(), 3);
        assert_eq!(outcome.transitions.len(), 2);
        assert!(matches!(
            outcome.failure.unwrap().error,
            PatientError::NonPositiveInterval { visit_index: 3, .. }
        ));
    }

    #[test]
    fn patient_without_visits_is_not_an_error() {
        let rec = record("M", Vec::new());
        let outcome = process_patient(&rec, &PipelineConfig::default());
        assert!(outcome.failure.is_none());
        assert!(outcome.initial_key.is_none());
    }
}
