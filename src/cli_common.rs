//! Pieces shared by the command line binaries.

use anyhow::{Context, Result};
use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use clap::Args;
use sparkify_warehouse::config::{AppConfig, CliConfig, FileConfig};
use sparkify_warehouse::sql::Dialect;
use sparkify_warehouse::warehouse::{BatchReport, ErrorPolicy};
use std::path::{Path, PathBuf};
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn get_styles() -> Styles {
    Styles::styled()
        .usage(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
        )
        .header(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
        )
        .literal(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

pub fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

pub fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to install tracing subscriber")
}

/// Flags that stand in for config file values.
#[derive(Args, Debug, Default)]
pub struct FallbackArgs {
    /// Warehouse backend to use when the config file does not name one.
    #[clap(long, value_enum)]
    pub backend: Option<Dialect>,

    /// SQLite database file for the sqlite backend.
    #[clap(long, value_parser = parse_path)]
    pub sqlite_path: Option<PathBuf>,

    /// What to do when a statement fails.
    #[clap(long, value_enum, default_value = "fail-fast")]
    pub on_error: ErrorPolicy,

    /// Location of the event log dataset.
    #[clap(long)]
    pub log_data: Option<String>,

    /// JSONPaths file describing the event log columns.
    #[clap(long)]
    pub log_jsonpath: Option<String>,

    /// Location of the song dataset.
    #[clap(long)]
    pub song_data: Option<String>,

    /// Region of the bucket holding the datasets.
    #[clap(long)]
    pub region: Option<String>,

    /// ARN of the role Redshift assumes for COPY.
    #[clap(long)]
    pub iam_role: Option<String>,

    /// Lake job input directory.
    #[clap(long, value_parser = parse_path)]
    pub input_path: Option<PathBuf>,

    /// Lake job output directory.
    #[clap(long, value_parser = parse_path)]
    pub output_path: Option<PathBuf>,
}

impl From<&FallbackArgs> for CliConfig {
    fn from(args: &FallbackArgs) -> Self {
        CliConfig {
            backend: args.backend,
            sqlite_path: args.sqlite_path.clone(),
            on_error: args.on_error,
            log_data: args.log_data.clone(),
            log_jsonpath: args.log_jsonpath.clone(),
            song_data: args.song_data.clone(),
            region: args.region.clone(),
            iam_role: args.iam_role.clone(),
            lake_input: args.input_path.clone(),
            lake_output: args.output_path.clone(),
        }
    }
}

/// Load `config` if given, else `default_name` from the working directory
/// when it exists, then resolve against the fallback flags.
pub fn load_config(
    config: Option<&Path>,
    default_name: &str,
    fallback: &FallbackArgs,
) -> Result<AppConfig> {
    let file_config = match config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => {
            let default_path = parse_path(default_name)?;
            if default_path.exists() {
                info!("Loading configuration from {:?}", default_path);
                Some(FileConfig::load(&default_path)?)
            } else {
                warn!(
                    "No config file given and {:?} not found, using flags only",
                    default_path
                );
                None
            }
        }
    };

    let app_config = AppConfig::resolve(&fallback.into(), file_config)?;
    info!("Configuration loaded:");
    info!("  backend: {}", app_config.dialect());
    info!("  on_error: {:?}", app_config.on_error);
    Ok(app_config)
}

pub fn log_batch_report(report: &BatchReport) {
    if report.is_complete() {
        info!(
            "Batch {}: {} statements executed",
            report.name, report.executed
        );
    } else {
        warn!(
            "Batch {}: {} executed, {} skipped, error: {}",
            report.name,
            report.executed,
            report.skipped,
            report.error.as_deref().unwrap_or("none")
        );
    }
}
