//! Imputation engine: fills gaps in one patient's visit sequence.
//!
//! Runs left to right over the visits in input order.
//! - size: first visit must be measured; a surgery visit without a measurement
//!   gets `previous x factor`; otherwise the previous size carries forward.
//! - symptoms: previous bucket carries forward, `none` before any text.
//! - grade: the most recent confirmed pathology grade carries forward,
//!   `grade_1` before any confirmation.
//! - velocity: `stable` at the first visit, the surgery visit and the first
//!   visit after it; short intervals keep the previous value.

use tracing::{debug, warn};

use crate::classify::{
    classify_grade, classify_radiation, classify_size, classify_surgery, classify_symptoms,
    classify_velocity, resolve_diameter,
};
use crate::config::PipelineConfig;
use crate::domain::{
    Grade, GradeSource, GrowthVelocity, ImputedVisit, PatientError, PatientId, PatientRecord,
    RawVisit, SizeSource, SurgeryKind, Symptoms, Warning, WarningKind,
};

/// Output of imputation for one patient.
#[derive(Debug, Clone, PartialEq)]
pub struct ImputedTimeline {
    pub visits: Vec<ImputedVisit>,
    pub warnings: Vec<Warning>,

    /// Set when a visit could not be resolved; `visits` then holds only the
    /// prefix before that visit.
    pub halted: Option<PatientError>,
}

/// Running state of the left-to-right pass.
struct Carry {
    previous: Option<ImputedVisit>,
    confirmed_grade: Option<Grade>,
    /// Size before the most recent surgery, until the first measurement after it.
    pre_surgery_cm: Option<f64>,
    /// The next visit is the first one after a surgery.
    reset_velocity: bool,
}

pub fn impute(
    record: &PatientRecord,
    config: &PipelineConfig,
) -> Result<ImputedTimeline, PatientError> {
    let patient_id = &record.patient_id;
    let mut visits: Vec<ImputedVisit> = Vec::with_capacity(record.visits.len());
    let mut warnings = Vec::new();
    let mut carry = Carry {
        previous: None,
        confirmed_grade: None,
        pre_surgery_cm: None,
        reset_velocity: false,
    };

    for (index, raw) in record.visits.iter().enumerate() {
        let Some(months) = raw.months(record.diagnosis_date) else {
            return halt(
                visits,
                warnings,
                PatientError::MissingTimestamp { visit_index: index },
            );
        };

        let interval = match &carry.previous {
            Some(prev) => {
                let interval = months - prev.months;
                if interval <= 0.0 {
                    return halt(
                        visits,
                        warnings,
                        PatientError::NonPositiveInterval {
                            visit_index: index,
                            interval_months: interval,
                        },
                    );
                }
                Some(interval)
            }
            None => None,
        };

        let surgery = raw
            .surgery_performed
            .then(|| classify_surgery(raw.surgery_type.as_deref()));
        let radiation = raw
            .radiation_performed
            .then(|| classify_radiation(raw.radiation_type.as_deref()));

        let (diameter_cm, size_source) = impute_diameter(
            patient_id,
            index,
            raw,
            surgery,
            &mut carry,
            &mut warnings,
            config,
        )?;

        let symptoms = match raw.symptoms_text.as_deref() {
            Some(text) => classify_symptoms(text),
            None => carry
                .previous
                .as_ref()
                .map_or(Symptoms::None, |prev| prev.symptoms),
        };

        let confirmed = raw.grade_from_pathology.as_deref().and_then(classify_grade);
        let (grade, grade_source) = match (confirmed, carry.confirmed_grade) {
            (Some(grade), _) => {
                carry.confirmed_grade = Some(grade);
                (grade, GradeSource::Confirmed)
            }
            (None, Some(grade)) => (grade, GradeSource::CarriedForward),
            (None, None) => (Grade::Grade1, GradeSource::Defaulted),
        };

        let velocity = match (&carry.previous, interval) {
            (Some(prev), Some(interval)) => {
                if surgery.is_some() {
                    carry.reset_velocity = true;
                    GrowthVelocity::Stable
                } else if carry.reset_velocity {
                    carry.reset_velocity = false;
                    GrowthVelocity::Stable
                } else if interval < config.min_velocity_interval_months {
                    warnings.push(Warning::at_visit(
                        patient_id.clone(),
                        index,
                        WarningKind::IntervalTooShort {
                            interval_months: interval,
                        },
                    ));
                    prev.velocity
                } else {
                    classify_velocity(prev.diameter_cm, diameter_cm, interval, config)
                }
            }
            _ => {
                carry.reset_velocity = surgery.is_some();
                GrowthVelocity::Stable
            }
        };

        let visit = ImputedVisit {
            index,
            months,
            diameter_cm,
            size: classify_size(diameter_cm),
            size_source,
            symptoms,
            velocity,
            grade,
            grade_source,
            surgery,
            surgery_months: surgery.map(|_| intervention_time(raw.surgery_months, months)),
            radiation,
            radiation_months: radiation.map(|_| intervention_time(raw.radiation_months, months)),
            supportive_care: raw.supportive_care,
            recurrence_noted: raw.recurrence_noted,
        };
        carry.previous = Some(visit.clone());
        visits.push(visit);
    }

    Ok(ImputedTimeline {
        visits,
        warnings,
        halted: None,
    })
}

/// Reported intervention time, never later than the visit that records it.
fn intervention_time(reported: Option<f64>, visit_months: f64) -> f64 {
    reported.map_or(visit_months, |t| t.min(visit_months))
}

/// Stop at the current visit. Without any resolved visit there is nothing to keep.
fn halt(
    visits: Vec<ImputedVisit>,
    warnings: Vec<Warning>,
    error: PatientError,
) -> Result<ImputedTimeline, PatientError> {
    if visits.is_empty() {
        return Err(error);
    }
    Ok(ImputedTimeline {
        visits,
        warnings,
        halted: Some(error),
    })
}

fn impute_diameter(
    patient_id: &PatientId,
    index: usize,
    raw: &RawVisit,
    surgery: Option<SurgeryKind>,
    carry: &mut Carry,
    warnings: &mut Vec<Warning>,
    config: &PipelineConfig,
) -> Result<(f64, SizeSource), PatientError> {
    let measured = resolve_diameter(raw);

    let Some(prev) = &carry.previous else {
        // a baseline has no earlier size to guard against
        let diameter = measured.ok_or(PatientError::MissingBaseline)?;
        return Ok((diameter, SizeSource::Measured));
    };
    let previous_cm = prev.diameter_cm;

    if surgery.is_some() {
        carry.pre_surgery_cm = Some(previous_cm);
    }

    match measured {
        Some(measured_cm) => match carry.pre_surgery_cm.take() {
            Some(pre_surgery_cm) if measured_cm > pre_surgery_cm => {
                let capped_cm = pre_surgery_cm * config.contradiction_cap_factor;
                warn!(
                    patient = %patient_id,
                    visit = index,
                    pre_surgery_cm,
                    measured_cm,
                    capped_cm,
                    "post-surgery size exceeds pre-surgery size, capping"
                );
                warnings.push(Warning::at_visit(
                    patient_id.clone(),
                    index,
                    WarningKind::ContradictorySize {
                        pre_surgery_cm,
                        measured_cm,
                        capped_cm,
                    },
                ));
                Ok((capped_cm, SizeSource::Capped))
            }
            _ => Ok((measured_cm, SizeSource::Measured)),
        },
        None => match surgery {
            Some(kind) => {
                let factor = match kind {
                    SurgeryKind::Gtr => config.gtr_size_factor,
                    SurgeryKind::Str => config.str_size_factor,
                };
                debug!(patient = %patient_id, visit = index, ?kind, "imputing post-resection size");
                Ok((previous_cm * factor, SizeSource::ResectionImputed))
            }
            None => Ok((previous_cm, SizeSource::CarriedForward)),
        },
    }
}
