use clap::Parser;
use docdex::{
    config::{Config, ConfigOverrides},
    logging,
    pipeline::IndexPipeline,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Walk a directory tree and index extracted text into Elasticsearch.
///
/// All settings can come from the environment (`DOCDEX_*` variables); flags
/// override them for one-off runs.
#[derive(Debug, Parser)]
#[command(name = "docdex", version, about)]
struct Cli {
    /// Root directory to scan (overrides DOCDEX_ROOT_DIR).
    #[arg(long)]
    root: Option<PathBuf>,
    /// Tika extraction endpoint (overrides DOCDEX_TIKA_URL).
    #[arg(long)]
    tika_url: Option<String>,
    /// Elasticsearch base URL (overrides DOCDEX_ELASTICSEARCH_URL).
    #[arg(long)]
    elasticsearch_url: Option<String>,
    /// Elasticsearch index name (overrides DOCDEX_INDEX).
    #[arg(long)]
    index: Option<String>,
    /// Per-request timeout in seconds (overrides DOCDEX_REQUEST_TIMEOUT_SECS).
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl Cli {
    fn into_overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            root_dir: self.root,
            tika_url: self.tika_url,
            elasticsearch_url: self.elasticsearch_url,
            index: self.index,
            timeout_secs: self.timeout_secs,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing();

    let config = match Config::load(cli.into_overrides()) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let pipeline = match IndexPipeline::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            tracing::error!(error = %err, "Failed to initialize pipeline");
            return ExitCode::FAILURE;
        }
    };

    // Per-file failures are reported through logs and counters; only
    // startup problems fail the process.
    match pipeline.run(&config.root_dir).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Run aborted");
            ExitCode::FAILURE
        }
    }
}
