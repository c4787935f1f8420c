use anyhow::{Context, Result};
use clap::Parser;
use sparkify_warehouse::sql::SqlCatalog;
use sparkify_warehouse::warehouse::{self, run_batch};
use std::path::PathBuf;
use tracing::info;

mod cli_common;
use cli_common::{
    get_styles, init_tracing, load_config, log_batch_report, parse_path, FallbackArgs,
};

/// Bulk-copy the datasets into staging, then fill the star schema from it.
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

    let app_config = load_config(cli_args.config.as_deref(), "dwh.toml", &cli_args.fallback)?;
    let staging = app_config.require_staging()?;
    let catalog = SqlCatalog::new(app_config.dialect());

    let warehouse = warehouse::connect(&app_config.warehouse)
        .await
        .context("Failed to connect to warehouse")?;

    let report = run_batch(
        warehouse.as_ref(),
        "load_staging_tables",
        &catalog.copy_tables(staging),
        app_config.on_error,
    )
    .await?;
    log_batch_report(&report);

    let report = run_batch(
        warehouse.as_ref(),
        "insert_tables",
        &catalog.insert_tables(),
        app_config.on_error,
    )
    .await?;
    log_batch_report(&report);

    info!("ETL finished");
    Ok(())
}
