use anyhow::{Context, Result};
use clap::Parser;
use sparkify_warehouse::lake::LakeJob;
use std::path::PathBuf;
use tracing::info;

#[allow(dead_code)]
mod cli_common;
use cli_common::{get_styles, init_tracing, load_config, parse_path, FallbackArgs};

/// Turn the raw song and log JSON into partitioned Parquet tables.
#[derive(Parser, Debug)]
#[command(styles = get_styles())]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override flags.
    #[clap(value_parser = parse_path)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub fallback: FallbackArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    init_tracing()?;

    let app_config = load_config(cli_args.config.as_deref(), "dl.toml", &cli_args.fallback)?;
    let job = LakeJob::new(app_config.require_lake()?.clone())?;

    let report = tokio::task::spawn_blocking(move || job.run())
        .await
        .context("Lake job panicked")??;

    for table in &report.tables {
        info!(
            "  {:<18} {:>8} rows {:>5} files  {:?}",
            table.name, table.rows, table.files, table.path
        );
    }
    Ok(())
}
