//! PatientSource port - where patient records come from.
//!
//! レコードは外部のテキスト抽出処理が生成したものを、そのまま受け取ります。
//! 1 回の run で全件をまとめて読み込み、順序は入力のまま保持されます。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::PatientRecord;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// PatientSource loads the full, ordered batch of records for one run.
#[async_trait]
pub trait PatientSource: Send + Sync {
    async fn load(&self) -> Result<Vec<PatientRecord>, SourceError>;
}

/// Decode a JSON array of patient records.
pub fn decode_records(bytes: &[u8]) -> Result<Vec<PatientRecord>, SourceError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// In-memory source, mainly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<PatientRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<PatientRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl PatientSource for InMemorySource {
    async fn load(&self) -> Result<Vec<PatientRecord>, SourceError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_source_returns_records_in_order() {
        let records = decode_records(
            br#"[
                {"patient_id": "P1", "age_at_diagnosis": 44, "gender": "F",
                 "visits": [{"months_since_diagnosis": 0, "tumor_size_cm": 2.5}]},
                {"patient_id": "P2", "age_at_diagnosis": 71.5, "gender": "male",
                 "location": "sphenoid wing", "diagnosis_date": "2020-01-15",
                 "visits": [{"visit_date": "2020-01-15", "tumor_volume_cm3": 14.1}]}
            ]"#,
        )
        .unwrap();

        let source = InMemorySource::new(records);
        let loaded = source.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].patient_id.as_str(), "P1");
        assert_eq!(
            loaded[1].visits[0].months(loaded[1].diagnosis_date),
            Some(0.0)
        );
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = decode_records(b"{not json").unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }
}
