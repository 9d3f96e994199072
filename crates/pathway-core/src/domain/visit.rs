//! Derived visits: the engine's view of one encounter after bucketing.

use serde::{Deserialize, Serialize};

use super::action::{RadiationKind, SurgeryKind};
use super::state::{GrowthVelocity, StateId, Symptoms, TreatmentPhase, TumorSize};
use super::strata::Grade;

/// Where a visit's tumor diameter came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeSource {
    Measured,
    CarriedForward,
    /// Imputed from the pre-surgery size and the resection extent.
    ResectionImputed,
    /// Measured, but capped because it exceeded the pre-surgery size.
    Capped,
}

/// Where a visit's grade came from.
///
/// `Defaulted` marks the `grade_1` modeling assumption: no pathology had been
/// confirmed at or before this visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeSource {
    Confirmed,
    CarriedForward,
    Defaulted,
}

/// A visit after imputation, before treatment phases are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputedVisit {
    /// Position in the patient's input sequence.
    pub index: usize,
    pub months: f64,

    pub diameter_cm: f64,
    pub size: TumorSize,
    pub size_source: SizeSource,

    pub symptoms: Symptoms,
    pub velocity: GrowthVelocity,

    pub grade: Grade,
    pub grade_source: GradeSource,

    pub surgery: Option<SurgeryKind>,
    /// When the surgery happened; defaults to the visit time.
    pub surgery_months: Option<f64>,
    pub radiation: Option<RadiationKind>,
    pub radiation_months: Option<f64>,
    pub supportive_care: bool,
    pub recurrence_noted: bool,
}

/// A fully derived visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    #[serde(flatten)]
    pub observed: ImputedVisit,
    pub phase: TreatmentPhase,
}

impl Visit {
    pub fn new(observed: ImputedVisit, phase: TreatmentPhase) -> Self {
        Self { observed, phase }
    }

    pub fn index(&self) -> usize {
        self.observed.index
    }

    pub fn months(&self) -> f64 {
        self.observed.months
    }

    pub fn grade(&self) -> Grade {
        self.observed.grade
    }

    /// Canonical state of this visit.
    pub fn state(&self) -> StateId {
        StateId::new(
            self.observed.size,
            self.observed.symptoms,
            self.observed.velocity,
            self.phase,
        )
    }
}
