//! Command-line interface
//!
//! Three thin entry points over the pipeline: `harvest` (targets file ->
//! link store), `extract` (link store -> content store), and `run` (both in
//! sequence). Exit code 0 covers completed runs with partial per-item
//! failures; only configuration and startup errors are fatal.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::config::PipelineConfig;
use crate::pipeline::Pipeline;

/// linkharvest CLI
#[derive(Parser, Debug)]
#[command(name = "linkharvest")]
#[command(version)]
#[command(about = "Harvest search-result links and extract page text", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect result links from every configured search URL
    Harvest(HarvestArgs),

    /// Extract text content for every stored link without a prior success
    Extract(ExtractArgs),

    /// Run harvest then extraction in sequence
    Run(RunArgs),
}

/// Options shared by every subcommand
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Directory holding the persisted link and content stores
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Navigation timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Number of concurrent browser sessions
    #[arg(long)]
    pub sessions: Option<usize>,

    /// Base delay between page requests in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headed: bool,
}

#[derive(Args, Debug)]
pub struct HarvestArgs {
    /// JSON file of search URLs (array or {"urls": [...]})
    #[arg(long)]
    pub targets: PathBuf,

    /// Optional JSON file of URL substring patterns to exclude
    #[arg(long)]
    pub exclude: Option<PathBuf>,

    /// Maximum result pages per search target
    #[arg(long)]
    pub max_pages: Option<usize>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Minimum extracted-text length before a page counts as content
    #[arg(long)]
    pub min_content_length: Option<usize>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSON file of search URLs (array or {"urls": [...]})
    #[arg(long)]
    pub targets: PathBuf,

    /// Optional JSON file of URL substring patterns to exclude
    #[arg(long)]
    pub exclude: Option<PathBuf>,

    /// Maximum result pages per search target
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Minimum extracted-text length before a page counts as content
    #[arg(long)]
    pub min_content_length: Option<usize>,

    #[command(flatten)]
    pub common: CommonArgs,
}

fn build_config(
    common: &CommonArgs,
    max_pages: Option<usize>,
    min_content_length: Option<usize>,
) -> PipelineConfig {
    let mut builder = PipelineConfig::builder()
        .data_dir(&common.data_dir)
        .headless(!common.headed);

    if let Some(ms) = common.timeout_ms {
        builder = builder.navigation_timeout(Duration::from_millis(ms));
    }
    if let Some(sessions) = common.sessions {
        builder = builder.max_sessions(sessions);
    }
    if let Some(ms) = common.delay_ms {
        builder = builder.request_delay(Duration::from_millis(ms));
    }
    if let Some(pages) = max_pages {
        builder = builder.max_pages(pages);
    }
    if let Some(length) = min_content_length {
        builder = builder.min_content_length(length);
    }

    builder.build()
}

/// Wire Ctrl-C to the pipeline's cooperative stop signal
///
/// The first Ctrl-C requests a graceful halt at the next unit boundary; the
/// process still exits 0 with whatever the run completed.
fn install_stop_signal(pipeline: &Pipeline) {
    let stop = pipeline.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current page");
            stop.stop();
        }
    });
}

/// Execute a parsed CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let report = match cli.command {
        Commands::Harvest(args) => {
            let config = build_config(&args.common, args.max_pages, None);
            let mut pipeline = Pipeline::new(config)?;
            install_stop_signal(&pipeline);
            pipeline
                .harvest_only(&args.targets, args.exclude.as_deref())
                .await?
        }
        Commands::Extract(args) => {
            let config = build_config(&args.common, None, args.min_content_length);
            let mut pipeline = Pipeline::new(config)?;
            install_stop_signal(&pipeline);
            pipeline.extract_only().await?
        }
        Commands::Run(args) => {
            let config = build_config(&args.common, args.max_pages, args.min_content_length);
            let mut pipeline = Pipeline::new(config)?;
            install_stop_signal(&pipeline);
            pipeline
                .run(&args.targets, args.exclude.as_deref())
                .await?
        }
    };

    println!("{report}");
    Ok(())
}
