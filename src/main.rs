use anyhow::{bail, Context, Result};
use clap::Parser;
use sparkify_warehouse::pipeline::build_sparkify_pipeline;
use sparkify_warehouse::sql::SqlCatalog;
use sparkify_warehouse::tasks::TaskContext;
use sparkify_warehouse::warehouse;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[allow(dead_code)]
mod cli_common;
use cli_common::{get_styles, init_tracing, load_config, parse_path, FallbackArgs};

/// Stage the raw datasets, load the fact and dimension tables, then run the
/// data quality checks.
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

    let app_config = load_config(cli_args.config.as_deref(), "sparkify.toml", &cli_args.fallback)?;
    let staging = app_config.require_staging()?;

    let catalog = SqlCatalog::new(app_config.dialect());
    let pipeline = build_sparkify_pipeline(&catalog, staging, &app_config.pipeline)
        .context("Failed to build pipeline")?;

    let warehouse = warehouse::connect(&app_config.warehouse)
        .await
        .context("Failed to connect to warehouse")?;

    let cancellation_token = CancellationToken::new();
    let ctx = TaskContext::new(cancellation_token.clone(), warehouse);

    let signal_token = cancellation_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, cancelling remaining tasks");
            signal_token.cancel();
        }
    });

    let report = pipeline.run(&ctx).await?;
    for run in &report.runs {
        info!(
            "  {:<28} {:<16} {}ms",
            run.task_id,
            run.status.as_str(),
            run.duration.as_millis()
        );
    }

    if !report.is_success() {
        error!("Pipeline {} failed", report.pipeline_id);
        bail!("Pipeline {} did not complete successfully", report.pipeline_id);
    }
    Ok(())
}
