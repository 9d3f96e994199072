//! Input records produced by the text-extraction collaborator.
//!
//! Every extracted field is optional: gaps are filled by the imputation engine,
//! not here. Free-text fields are kept verbatim and bucketed by `classify`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::PatientId;

/// Average month length used to convert calendar dates to months.
pub const DAYS_PER_MONTH: f64 = 30.4375;

/// One patient: static demographics plus the ordered visit sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub patient_id: PatientId,

    /// Age in years at diagnosis.
    pub age_at_diagnosis: f64,

    /// Free-text gender as extracted ("male", "F", ...).
    pub gender: String,

    /// Free-text tumor location at diagnosis.
    #[serde(default)]
    pub location: Option<String>,

    /// Required only when visits carry calendar dates.
    #[serde(default)]
    pub diagnosis_date: Option<NaiveDate>,

    #[serde(default)]
    pub visits: Vec<RawVisit>,
}

/// One recorded encounter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawVisit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months_since_diagnosis: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tumor_size_cm: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tumor_volume_cm3: Option<f64>,

    /// Per-axis diameters in cm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tumor_dimensions_cm: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms_text: Option<String>,

    #[serde(default)]
    pub surgery_performed: bool,

    /// "gtr", "subtotal", "Simpson grade II", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surgery_type: Option<String>,

    /// Time of the surgery when it differs from the visit time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surgery_months: Option<f64>,

    #[serde(default)]
    pub radiation_performed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radiation_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radiation_months: Option<f64>,

    #[serde(default)]
    pub supportive_care: bool,

    /// Pathology text or a `grade_N` label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_from_pathology: Option<String>,

    #[serde(default)]
    pub recurrence_noted: bool,
}

impl RawVisit {
    /// Convenience constructor for a visit at a given month.
    pub fn at(months: f64) -> Self {
        Self {
            months_since_diagnosis: Some(months),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, cm: f64) -> Self {
        self.tumor_size_cm = Some(cm);
        self
    }

    pub fn with_symptoms(mut self, text: impl Into<String>) -> Self {
        self.symptoms_text = Some(text.into());
        self
    }

    pub fn with_surgery(mut self, kind: impl Into<String>) -> Self {
        self.surgery_performed = true;
        self.surgery_type = Some(kind.into());
        self
    }

    pub fn with_radiation(mut self, kind: impl Into<String>) -> Self {
        self.radiation_performed = true;
        self.radiation_type = Some(kind.into());
        self
    }

    pub fn with_pathology(mut self, text: impl Into<String>) -> Self {
        self.grade_from_pathology = Some(text.into());
        self
    }

    pub fn with_recurrence(mut self) -> Self {
        self.recurrence_noted = true;
        self
    }

    /// Visit time in months since diagnosis.
    ///
    /// An explicit month value wins; otherwise the calendar date is converted
    /// relative to the diagnosis date.
    pub fn months(&self, diagnosis_date: Option<NaiveDate>) -> Option<f64> {
        if let Some(months) = self.months_since_diagnosis {
            return Some(months);
        }
        let (date, diagnosed) = (self.visit_date?, diagnosis_date?);
        let days = date.signed_duration_since(diagnosed).num_days();
        Some(days as f64 / DAYS_PER_MONTH)
    }
}
