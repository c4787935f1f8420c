use super::copy::{CopySpec, JsonFormat};
use super::{Scalar, Warehouse, WarehouseError};
use crate::sql::Dialect;
use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, SimpleQueryMessage};
use tracing::{error, info};

/// Connection parameters for a Redshift cluster.
#[derive(Debug, Clone)]
pub struct RedshiftConnectionSettings {
    pub host: String,
    pub db_name: String,
    pub user: String,
    pub password: String,
    pub port: u16,
    /// Role Redshift assumes to read from object storage during `COPY`.
    pub iam_role: Option<String>,
    pub region: Option<String>,
}

impl RedshiftConnectionSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "host={} dbname={} user={} password={} port={}",
            self.host, self.db_name, self.user, self.password, self.port
        )
    }
}

/// Redshift (or any Postgres-protocol) warehouse.
pub struct RedshiftWarehouse {
    client: Client,
    iam_role: Option<String>,
    region: Option<String>,
}

impl RedshiftWarehouse {
    pub async fn connect(settings: &RedshiftConnectionSettings) -> Result<Self, WarehouseError> {
        info!(
            "Connecting to Redshift at {}:{}/{}",
            settings.host, settings.port, settings.db_name
        );
        let (client, connection) =
            tokio_postgres::connect(&settings.connection_string(), NoTls).await?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("Redshift connection closed with error: {}", e);
            }
        });
        Ok(Self {
            client,
            iam_role: settings.iam_role.clone(),
            region: settings.region.clone(),
        })
    }
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Render the `COPY` statement for a bulk load from object storage.
pub(crate) fn render_copy(
    spec: &CopySpec,
    iam_role: &str,
    region: &str,
) -> String {
    let format = match &spec.format {
        JsonFormat::Auto => quote_literal("auto"),
        JsonFormat::Paths(location) => quote_literal(location),
    };
    let mut sql = format!(
        "COPY {} FROM {} IAM_ROLE {} FORMAT JSON AS {} REGION {}",
        spec.table,
        quote_literal(&spec.source),
        quote_literal(iam_role),
        format,
        quote_literal(region)
    );
    if spec.compupdate_off {
        sql.push_str(" COMPUPDATE OFF");
    }
    sql.push(';');
    sql
}

/// Scalars come back over the simple-query protocol as text, whatever the
/// column type (`NUMERIC` and `BIGINT` aggregates included).
fn text_scalar(value: Option<&str>) -> Scalar {
    match value {
        Some(text) => Scalar::Text(text.to_string()),
        None => Scalar::Null,
    }
}

#[async_trait]
impl Warehouse for RedshiftWarehouse {
    fn dialect(&self) -> Dialect {
        Dialect::Redshift
    }

    async fn execute(&self, sql: &str) -> Result<u64, WarehouseError> {
        Ok(self.client.execute(sql, &[]).await?)
    }

    async fn query_scalar(&self, sql: &str) -> Result<Scalar, WarehouseError> {
        let messages = self.client.simple_query(sql).await?;
        let row = messages
            .iter()
            .find_map(|message| match message {
                SimpleQueryMessage::Row(row) => Some(row),
                _ => None,
            })
            .ok_or_else(|| WarehouseError::EmptyResult(sql.to_string()))?;
        if row.columns().is_empty() {
            return Err(WarehouseError::EmptyResult(sql.to_string()));
        }
        Ok(text_scalar(row.try_get(0)?))
    }

    async fn copy_from(&self, spec: &CopySpec) -> Result<u64, WarehouseError> {
        let iam_role = self.iam_role.as_deref().ok_or_else(|| {
            WarehouseError::Unsupported("COPY requires an IAM role ARN".to_string())
        })?;
        let region = self.region.as_deref().ok_or_else(|| {
            WarehouseError::Unsupported("COPY requires an object-storage region".to_string())
        })?;
        let sql = render_copy(spec, iam_role, region);
        info!("Copying {} into {}", spec.source, spec.table);
        Ok(self.client.execute(sql.as_str(), &[]).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_copy_with_jsonpaths() {
        let spec = CopySpec::new(
            "staging_events",
            "s3://udacity-dend/log_data",
            JsonFormat::Paths("s3://udacity-dend/log_json_path.json".to_string()),
        );
        let sql = render_copy(&spec, "arn:aws:iam::123:role/dwh", "us-west-2");
        assert_eq!(
            sql,
            "COPY staging_events FROM 's3://udacity-dend/log_data' \
             IAM_ROLE 'arn:aws:iam::123:role/dwh' \
             FORMAT JSON AS 's3://udacity-dend/log_json_path.json' \
             REGION 'us-west-2';"
        );
    }

    #[test]
    fn test_render_copy_auto_with_compupdate_off() {
        let spec = CopySpec::new("staging_songs", "s3://udacity-dend/song_data", JsonFormat::Auto)
            .with_compupdate_off();
        let sql = render_copy(&spec, "arn", "us-west-2");
        assert!(sql.contains("FORMAT JSON AS 'auto'"));
        assert!(sql.ends_with("COMPUPDATE OFF;"));
    }

    #[test]
    fn test_render_copy_escapes_quotes() {
        let spec = CopySpec::new("staging_songs", "s3://bucket/o'brien", JsonFormat::Auto);
        let sql = render_copy(&spec, "arn", "eu-west-1");
        assert!(sql.contains("'s3://bucket/o''brien'"));
    }

    #[test]
    fn test_text_scalar_matches_numeric_expectations() {
        assert!(text_scalar(Some("0")).matches(&Scalar::Integer(0)));
        assert!(text_scalar(Some("152.92036")).matches(&Scalar::Real(152.92036)));
        assert!(!text_scalar(Some("3")).matches(&Scalar::Integer(0)));
        assert_eq!(text_scalar(Some("free")), Scalar::Text("free".to_string()));
        assert_eq!(text_scalar(None), Scalar::Null);
    }

    #[test]
    fn test_connection_string() {
        let settings = RedshiftConnectionSettings {
            host: "dwh.example.com".to_string(),
            db_name: "dev".to_string(),
            user: "awsuser".to_string(),
            password: "secret".to_string(),
            port: 5439,
            iam_role: None,
            region: None,
        };
        assert_eq!(
            settings.connection_string(),
            "host=dwh.example.com dbname=dev user=awsuser password=secret port=5439"
        );
    }
}
