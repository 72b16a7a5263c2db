pub mod export;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use export::{process_export_command, ExportArgs};
use tracing::level_filters::LevelFilter;

use crate::utils::logging::enable_logging;

#[derive(Parser, Debug)]
#[command(name = "rescuetime-export", version, long_about = None)]
#[command(about = "Exports RescueTime hourly analytics into a per-day spreadsheet table")]
struct Args {
    #[command(flatten)]
    export: ExportArgs,
    #[arg(long, help = "Print debug logs to stderr")]
    log: bool,
    #[arg(long = "log-filter", help = "Log level, overrides RUST_LOG")]
    log_filter: Option<LevelFilter>,
    #[arg(long = "log-dir", help = "Also write logs into daily rotated files in this directory")]
    log_dir: Option<PathBuf>,
}

pub async fn run_cli() -> Result<()> {
    // Values from .env are only used when the real environment doesn't set them.
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let logging_level = match (args.log_filter, args.log) {
        (Some(level), _) => Some(level),
        (None, true) => Some(LevelFilter::DEBUG),
        (None, false) => None,
    };
    enable_logging(args.log_dir.as_deref(), logging_level, args.log)?;

    process_export_command(args.export).await
}
