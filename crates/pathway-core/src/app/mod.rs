//! App - アプリケーション層
//!
//! engine と graph を組み合わせて、患者バッチ全体を 1 回の run として処理します。
//!
//! # 主要コンポーネント
//! - **Pipeline**: 逐次実行
//! - **WorkerPool**: 患者単位の並行処理 + 入力順での単一 writer fold
//! - **PipelineOutput**: グラフ, 患者レポート, エラー, 警告, カウンタ

pub mod output;
pub mod pipeline;
pub mod worker;

pub use self::output::{PatientReport, PipelineOutput};
pub use self::pipeline::Pipeline;
pub use self::worker::WorkerPool;
