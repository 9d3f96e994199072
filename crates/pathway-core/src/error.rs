use thiserror::Error;

use crate::config::ConfigError;
use crate::ports::SourceError;

/// Run-level failures. Per-patient errors never surface here; they are
/// reported in the pipeline output instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to load patient records: {0}")]
    Source(#[from] SourceError),

    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("no outcome produced for patient at input position {index}")]
    MissingOutcome { index: usize },
}
