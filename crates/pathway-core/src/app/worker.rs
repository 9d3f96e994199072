//! WorkerPool - concurrent per-patient processing.
//!
//! `n` 個の tokio タスクが共有キューから入力位置を取り出し、
//! `(position, outcome)` を mpsc で送り返します。
//!
//! ## 順序
//! - 集約前に outcome を入力順へ並べ直す
//! - fold は 1 つのタスクだけが行う（グラフへの書き込みは単一 writer）
//! - 結果は逐次 Pipeline と同一

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span};

use super::output::{PipelineOutput, fold_outcomes};
use crate::config::PipelineConfig;
use crate::domain::{PatientRecord, RunId};
use crate::engine::{PatientOutcome, process_patient};
use crate::error::PipelineError;
use crate::ports::PatientSource;

pub struct WorkerPool {
    config: Arc<PipelineConfig>,
}

impl WorkerPool {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Load every record from `source` and run them.
    pub async fn run_source(
        &self,
        source: &dyn PatientSource,
    ) -> Result<PipelineOutput, PipelineError> {
        let records = source.load().await?;
        self.run(records).await
    }

    pub async fn run(&self, records: Vec<PatientRecord>) -> Result<PipelineOutput, PipelineError> {
        self.run_with_id(RunId::generate(), records).await
    }

    pub async fn run_with_id(
        &self,
        run_id: RunId,
        records: Vec<PatientRecord>,
    ) -> Result<PipelineOutput, PipelineError> {
        let span = info_span!("pipeline_run", %run_id, mode = "concurrent");
        async move {
            info!(
                patients = records.len(),
                workers = self.config.workers,
                "run started"
            );
            let records = Arc::new(records);
            let outcomes = self.process(Arc::clone(&records)).await?;
            let output = fold_outcomes(run_id, &records, outcomes);
            info!(
                failed = output.summary.patients_failed,
                transitions = output.summary.raw_transitions,
                edges = output.summary.distinct_edges,
                warnings = output.summary.warnings,
                "run finished"
            );
            Ok(output)
        }
        .instrument(span)
        .await
    }

    /// Per-patient stage only, outcomes in input order.
    pub async fn process(
        &self,
        records: Arc<Vec<PatientRecord>>,
    ) -> Result<Vec<PatientOutcome>, PipelineError> {
        let total = records.len();
        let queue = Arc::new(Mutex::new((0..total).collect::<VecDeque<usize>>()));
        let (tx, mut rx) = mpsc::channel::<(usize, PatientOutcome)>(total.max(1));

        let mut joins: Vec<JoinHandle<()>> = Vec::with_capacity(self.config.workers);
        for worker_id in 0..self.config.workers {
            let queue = Arc::clone(&queue);
            let records = Arc::clone(&records);
            let config = Arc::clone(&self.config);
            let tx = tx.clone();
            let join = tokio::spawn(
                worker_loop(worker_id, queue, records, config, tx).in_current_span(),
            );
            joins.push(join);
        }
        // Workers hold the remaining senders; the channel closes when they finish.
        drop(tx);

        let mut slots: Vec<Option<PatientOutcome>> = (0..total).map(|_| None).collect();
        while let Some((index, outcome)) = rx.recv().await {
            slots[index] = Some(outcome);
        }
        for join in joins {
            join.await?;
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(PipelineError::MissingOutcome { index }))
            .collect()
    }
}

async fn worker_loop(
    worker_id: usize,
    queue: Arc<Mutex<VecDeque<usize>>>,
    records: Arc<Vec<PatientRecord>>,
    config: Arc<PipelineConfig>,
    tx: mpsc::Sender<(usize, PatientOutcome)>,
) {
    let mut handled = 0usize;
    loop {
        // lock only for the pop; never held across processing
        let next = queue.lock().await.pop_front();
        let Some(index) = next else {
            break;
        };

        let outcome = process_patient(&records[index], &config);
        if tx.send((index, outcome)).await.is_err() {
            // receiver gone: the run was abandoned
            break;
        }
        handled += 1;
    }
    debug!(worker_id, handled, "worker finished");
}
