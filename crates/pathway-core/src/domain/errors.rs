//! Errors - 患者単位の失敗とその分類

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::PatientId;

/// ErrorKind は条件が run に与える影響の分類
///
/// - Fatal: その患者の処理を止める（他の患者には影響しない）
/// - Recoverable: 処理を続け、出力に警告を付ける
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Fatal,
    Recoverable,
}

/// A condition that stops processing for one patient.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatientError {
    #[error("first visit has no tumor measurement")]
    MissingBaseline,

    #[error("unrecognized {field} value {value:?}")]
    UnrecognizedCategory { field: String, value: String },

    #[error("non-positive interval of {interval_months} months before visit {visit_index}")]
    NonPositiveInterval {
        visit_index: usize,
        interval_months: f64,
    },

    #[error("visit {visit_index} has neither months_since_diagnosis nor a resolvable visit_date")]
    MissingTimestamp { visit_index: usize },
}

impl PatientError {
    pub fn unrecognized(field: &str, value: &str) -> Self {
        PatientError::UnrecognizedCategory {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Fatal
    }
}

/// A fatal patient error as reported in the pipeline output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientFailure {
    pub patient_id: PatientId,
    pub error: PatientError,
    pub message: String,
}

impl PatientFailure {
    pub fn new(patient_id: PatientId, error: PatientError) -> Self {
        let message = error.to_string();
        Self {
            patient_id,
            error,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_readable_messages() {
        let err = PatientError::unrecognized("gender", "unknown");
        assert_eq!(err.to_string(), "unrecognized gender value \"unknown\"");
        assert_eq!(err.kind(), ErrorKind::Fatal);
    }

    #[test]
    fn failure_serializes_with_tagged_error() {
        let failure = PatientFailure::new(PatientId::new("P9"), PatientError::MissingBaseline);
        let v = serde_json::to_value(&failure).unwrap();
        assert_eq!(v["patient_id"], "P9");
        assert_eq!(v["error"]["kind"], "missing_baseline");
        assert_eq!(v["message"], "first visit has no tumor measurement");
    }
}
