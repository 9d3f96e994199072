//! Domain identifiers (strongly-typed IDs).
//!
//! ## PatientId
//! 抽出処理が付与した ID をそのまま保持する文字列ラッパー。
//! `Edge` の `BTreeSet<PatientId>` のキーとして使う。
//!
//! ## RunId
//! 1 回の run を表す ULID。ログ行の突き合わせに使うだけで、永続化はしない。

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Identifier of a patient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(String);

impl PatientId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a pipeline run.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Ulid);

impl RunId {
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_id_serializes_as_plain_string() {
        let id = PatientId::new("P-001");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"P-001\"");

        let back: PatientId = serde_json::from_str("\"P-001\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn run_ids_display_with_prefix_and_sort_by_time() {
        let first = RunId::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = RunId::generate();

        assert!(first.to_string().starts_with("run-"));
        assert!(first < second);
    }

    #[test]
    fn run_id_wraps_ulid_without_overhead() {
        let ulid = Ulid::new();
        assert_eq!(RunId::from_ulid(ulid).as_ulid(), ulid);
        assert_eq!(std::mem::size_of::<RunId>(), std::mem::size_of::<Ulid>());
    }
}
