use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pathway_core::domain::PatientRecord;
use pathway_core::ports::decode_records;
use pathway_core::{PatientSource, PipelineConfig, SourceError, WorkerPool};

#[derive(Parser)]
#[command(name = "pathway")]
#[command(about = "Meningioma treatment-pathway MDP graphs", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON file holding an array of patient records
    records: PathBuf,

    /// Pipeline configuration (TOML); defaults apply when omitted
    #[arg(long, env = "PATHWAY_CONFIG")]
    config: Option<PathBuf>,
}

/// JSON ファイルから患者レコードを読むソース
struct JsonFileSource {
    path: PathBuf,
}

#[async_trait]
impl PatientSource for JsonFileSource {
    async fn load(&self) -> Result<Vec<PatientRecord>, SourceError> {
        let bytes = tokio::fs::read(&self.path).await?;
        decode_records(&bytes)
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let pool = WorkerPool::new(config).context("invalid pipeline configuration")?;

    let source = JsonFileSource {
        path: cli.records.clone(),
    };
    info!(path = %source.path.display(), "loading records");
    let output = pool
        .run_source(&source)
        .await
        .with_context(|| format!("failed to process {}", cli.records.display()))?;

    // graphs は stdout、ログは stderr
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output)
        .context("failed to serialize pipeline output")?;
    writeln!(stdout)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pathway_core=info,pathway=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run(cli).await
}
