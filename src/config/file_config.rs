use crate::tasks::DataQualityCheck;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub warehouse: Option<WarehouseConfig>,
    pub cluster: Option<ClusterConfig>,
    pub iam_role: Option<IamRoleConfig>,
    pub staging: Option<StagingConfig>,
    pub lake: Option<LakeConfig>,
    pub pipeline: Option<PipelineConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct WarehouseConfig {
    /// "sqlite" or "redshift"
    pub backend: Option<String>,
    pub sqlite_path: Option<String>,
    /// "fail_fast" or "best_effort"
    pub on_error: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ClusterConfig {
    pub host: Option<String>,
    pub db_name: Option<String>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_port: Option<u16>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct IamRoleConfig {
    pub arn: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct StagingConfig {
    pub log_data: Option<String>,
    pub log_jsonpath: Option<String>,
    pub song_data: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct LakeConfig {
    pub input_path: Option<String>,
    pub output_path: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    pub id: Option<String>,
    pub truncate_dimensions: Option<bool>,
    /// Replaces the default null-key checks; an empty list disables checks.
    pub quality_checks: Option<Vec<DataQualityCheck>>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::Scalar;
    use std::io::Write;

    #[test]
    fn test_load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[warehouse]
backend = "redshift"
on_error = "best_effort"

[cluster]
host = "example.redshift.amazonaws.com"
db_name = "dev"
db_user = "awsuser"
db_password = "secret"
db_port = 5439

[iam_role]
arn = "arn:aws:iam::123456789012:role/dwhRole"

[staging]
log_data = "s3://udacity-dend/log_data"
log_jsonpath = "s3://udacity-dend/log_json_path.json"
song_data = "s3://udacity-dend/song_data"
region = "us-west-2"

[pipeline]
truncate_dimensions = false

[[pipeline.quality_checks]]
sql_query = "SELECT COUNT(*) FROM dim_users WHERE user_id IS NULL"
expected_result = 0
"#
        )
        .unwrap();

        let config = FileConfig::load(file.path()).unwrap();
        let warehouse = config.warehouse.unwrap();
        assert_eq!(warehouse.backend.as_deref(), Some("redshift"));
        assert_eq!(config.cluster.unwrap().db_port, Some(5439));
        assert_eq!(
            config.iam_role.unwrap().arn.as_deref(),
            Some("arn:aws:iam::123456789012:role/dwhRole")
        );
        assert!(config.lake.is_none());

        let pipeline = config.pipeline.unwrap();
        assert_eq!(pipeline.truncate_dimensions, Some(false));
        let checks = pipeline.quality_checks.unwrap();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].expected_result, Scalar::Integer(0));
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = FileConfig::load(file.path()).unwrap();
        assert!(config.warehouse.is_none());
        assert!(config.pipeline.is_none());
    }

    #[test]
    fn test_missing_file_error() {
        let result = FileConfig::load(Path::new("/nonexistent/sparkify.toml"));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read config file"));
    }
}
