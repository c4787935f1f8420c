mod file_config;

pub use file_config::{
    ClusterConfig, FileConfig, IamRoleConfig, LakeConfig, PipelineConfig, StagingConfig,
    WarehouseConfig,
};

use crate::lake::LakeSettings;
use crate::pipeline::{PipelineSettings, DEFAULT_PIPELINE_ID};
use crate::sql::{Dialect, StagingSources};
use crate::tasks::DataQualityCheck;
use crate::warehouse::{ErrorPolicy, RedshiftConnectionSettings, WarehouseSettings};
use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_SQLITE_PATH: &str = "sparkify.db";
pub const DEFAULT_REDSHIFT_PORT: u16 = 5439;

/// CLI arguments that can be used for config resolution.
/// Every value here is a fallback for the TOML file.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub backend: Option<Dialect>,
    pub sqlite_path: Option<PathBuf>,
    pub on_error: ErrorPolicy,
    pub log_data: Option<String>,
    pub log_jsonpath: Option<String>,
    pub song_data: Option<String>,
    pub region: Option<String>,
    pub iam_role: Option<String>,
    pub lake_input: Option<PathBuf>,
    pub lake_output: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub warehouse: WarehouseSettings,
    pub on_error: ErrorPolicy,
    pub staging: Option<StagingSources>,
    pub lake: Option<LakeSettings>,
    pub pipeline: PipelineSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let warehouse_file = file.warehouse.unwrap_or_default();
        let staging_file = file.staging.unwrap_or_default();

        let backend = match warehouse_file.backend {
            Some(s) => parse_value::<Dialect>("warehouse backend", &s)?,
            None => cli.backend.unwrap_or(Dialect::Sqlite),
        };
        let on_error = match warehouse_file.on_error {
            Some(s) => parse_value::<ErrorPolicy>("error policy", &s)?,
            None => cli.on_error,
        };

        let iam_role = file
            .iam_role
            .and_then(|r| r.arn)
            .or_else(|| cli.iam_role.clone());
        let region = staging_file.region.clone().or_else(|| cli.region.clone());

        let warehouse = match backend {
            Dialect::Sqlite => WarehouseSettings::Sqlite {
                path: warehouse_file
                    .sqlite_path
                    .map(PathBuf::from)
                    .or_else(|| cli.sqlite_path.clone())
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SQLITE_PATH)),
            },
            Dialect::Redshift => {
                let cluster = file.cluster.ok_or_else(|| {
                    anyhow!("The redshift backend requires a [cluster] section in the config file")
                })?;
                WarehouseSettings::Redshift(RedshiftConnectionSettings {
                    host: required(cluster.host, "cluster.host")?,
                    db_name: required(cluster.db_name, "cluster.db_name")?,
                    user: required(cluster.db_user, "cluster.db_user")?,
                    password: required(cluster.db_password, "cluster.db_password")?,
                    port: cluster.db_port.unwrap_or(DEFAULT_REDSHIFT_PORT),
                    iam_role: iam_role.clone(),
                    region: region.clone(),
                })
            }
        };

        let log_data = staging_file.log_data.or_else(|| cli.log_data.clone());
        let song_data = staging_file.song_data.or_else(|| cli.song_data.clone());
        let staging = match (log_data, song_data) {
            (Some(log_data), Some(song_data)) => Some(StagingSources {
                log_data,
                log_jsonpath: staging_file
                    .log_jsonpath
                    .or_else(|| cli.log_jsonpath.clone()),
                song_data,
            }),
            (None, None) => None,
            _ => bail!("Both staging.log_data and staging.song_data must be specified together"),
        };

        if backend == Dialect::Redshift && staging.is_some() {
            if iam_role.is_none() {
                bail!("Loading staging data into Redshift requires [iam_role] arn");
            }
            if region.is_none() {
                bail!("Loading staging data into Redshift requires staging.region");
            }
        }

        let lake_file = file.lake.unwrap_or_default();
        let lake_input = lake_file
            .input_path
            .map(PathBuf::from)
            .or_else(|| cli.lake_input.clone());
        let lake_output = lake_file
            .output_path
            .map(PathBuf::from)
            .or_else(|| cli.lake_output.clone());
        let lake = match (lake_input, lake_output) {
            (Some(input_path), Some(output_path)) => Some(LakeSettings {
                input_path,
                output_path,
            }),
            (None, None) => None,
            _ => bail!("Both lake.input_path and lake.output_path must be specified together"),
        };

        let pipeline_file = file.pipeline.unwrap_or_default();
        let pipeline = PipelineSettings {
            id: pipeline_file
                .id
                .unwrap_or_else(|| DEFAULT_PIPELINE_ID.to_string()),
            truncate_dimensions: pipeline_file.truncate_dimensions.unwrap_or(true),
            quality_checks: pipeline_file
                .quality_checks
                .unwrap_or_else(DataQualityCheck::null_key_checks),
        };

        Ok(Self {
            warehouse,
            on_error,
            staging,
            lake,
            pipeline,
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.warehouse.dialect()
    }

    pub fn require_staging(&self) -> Result<&StagingSources> {
        self.staging.as_ref().ok_or_else(|| {
            anyhow!("staging.log_data and staging.song_data must be specified via flags or in config file")
        })
    }

    pub fn require_lake(&self) -> Result<&LakeSettings> {
        self.lake.as_ref().ok_or_else(|| {
            anyhow!("lake.input_path and lake.output_path must be specified via flags or in config file")
        })
    }
}

fn required(value: Option<String>, key: &str) -> Result<String> {
    value.ok_or_else(|| anyhow!("{} must be specified in config file", key))
}

/// Parses a config string into a clap value enum, case insensitive.
/// `best_effort` and `best-effort` are both accepted.
fn parse_value<T: ValueEnum>(what: &str, s: &str) -> Result<T> {
    T::from_str(&s.replace('_', "-"), true).map_err(|_| anyhow!("Invalid {}: {}", what, s))
}
