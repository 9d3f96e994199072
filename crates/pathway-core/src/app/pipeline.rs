//! Pipeline - sequential batch run over a set of patient records.

use tracing::{info, info_span};

use super::output::{PipelineOutput, fold_outcomes};
use crate::config::PipelineConfig;
use crate::domain::{PatientRecord, RunId};
use crate::engine::process_patient;
use crate::error::PipelineError;

/// Pipeline runs every patient on the calling thread, in input order.
///
/// # Example
/// ```ignore
/// let pipeline = Pipeline::new(PipelineConfig::default())?;
/// let output = pipeline.run(&records);
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Fails fast on an invalid configuration.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn run(&self, records: &[PatientRecord]) -> PipelineOutput {
        self.run_with_id(RunId::generate(), records)
    }

    pub fn run_with_id(&self, run_id: RunId, records: &[PatientRecord]) -> PipelineOutput {
        let span = info_span!("pipeline_run", %run_id, mode = "sequential");
        let _guard = span.enter();
        info!(patients = records.len(), "run started");

        let outcomes = records
            .iter()
            .map(|record| process_patient(record, &self.config))
            .collect();
        let output = fold_outcomes(run_id, records, outcomes);

        info!(
            failed = output.summary.patients_failed,
            transitions = output.summary.raw_transitions,
            edges = output.summary.distinct_edges,
            warnings = output.summary.warnings,
            "run finished"
        );
        output
    }
}
