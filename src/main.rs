use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use db_to_json::{Pipeline, RowFailurePolicy, load_config};

/// Bind database rows to typed records and write them back as JSON
#[derive(Debug, Parser)]
#[command(name = "db-to-json", version)]
struct Args {
    /// Configuration file (.properties, .yaml or .yml)
    #[arg(short, long)]
    config: PathBuf,

    /// Log filter, overridden by RUST_LOG when set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Bind and serialize every row without executing updates
    #[arg(long)]
    dry_run: bool,

    /// Skip failing rows instead of abandoning the rest of their dataset
    #[arg(long)]
    skip_failed_rows: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level.as_str()))
        .init();

    let mut config = load_config(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;

    if args.dry_run {
        config.options.dry_run = true;
    }
    if args.skip_failed_rows {
        config.options.row_failure_policy = RowFailurePolicy::SkipRow;
    }
    info!("Row failure policy: {}", config.options.row_failure_policy);

    let summary = Pipeline::from_config(config).run();
    summary.log();

    Ok(())
}
