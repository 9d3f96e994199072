//! pathway-core
//!
//! Turns longitudinal meningioma visit records into per-stratification MDP graphs.
//!
//! # モジュール構成
//! - **domain**: 値型（層別キー, 状態, 行動, 受診, 遷移, 警告, エラー）
//! - **classify**: 生の臨床値をバケットに分類する純粋関数
//! - **engine**: 患者ごとの補完, 治療フェーズ, 状態/行動の組み立て, 遷移生成
//! - **graph**: 90 個の層別グラフと集約 fold
//! - **validate**: 読み取り専用の整合性チェック（警告のみ）
//! - **app**: 逐次 Pipeline と並行 WorkerPool
//! - **ports**: 患者レコードの入力元
//! - **config**: パイプラインの調整値（TOML）
//!
//! # データの流れ
//! 1. `PatientSource` から全レコードを読む
//! 2. `process_patient` を患者ごとに実行（並行可）
//! 3. `GraphRegistry` へ単一 writer で fold
//! 4. `PipelineOutput` として返す

pub mod app;
pub mod classify;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod graph;
pub mod observability;
pub mod ports;
pub mod validate;

pub use app::{PatientReport, Pipeline, PipelineOutput, WorkerPool};
pub use config::{ConfigError, PipelineConfig};
pub use error::PipelineError;
pub use graph::{Graph, GraphRegistry};
pub use observability::RunSummary;
pub use ports::{InMemorySource, PatientSource, SourceError};
