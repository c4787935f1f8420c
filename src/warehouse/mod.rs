//! Connection layer for the target warehouse.
//!
//! Everything that talks to a database goes through the [`Warehouse`] trait so
//! that tasks and batches can run against Redshift in production and against
//! SQLite locally and in tests.

mod batch;
mod copy;
mod json_path;
mod redshift_warehouse;
mod scalar;
mod sqlite_warehouse;

pub use batch::{run_batch, BatchReport, ErrorPolicy, Statement};
pub use copy::{CopySpec, JsonFormat};
pub use redshift_warehouse::{RedshiftConnectionSettings, RedshiftWarehouse};
pub use scalar::Scalar;
pub use sqlite_warehouse::SqliteWarehouse;

use crate::sql::Dialect;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by a warehouse backend.
#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid JSONPaths expression: {0}")]
    InvalidJsonPath(String),

    #[error("Query returned no rows: {0}")]
    EmptyResult(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// A connection to the target store.
///
/// Every statement is committed on its own; implementations never open
/// transactions that span calls.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// SQL dialect understood by this backend.
    fn dialect(&self) -> Dialect;

    /// Execute a single statement, returning the number of affected rows.
    async fn execute(&self, sql: &str) -> Result<u64, WarehouseError>;

    /// Run a query and return the first column of its first row.
    ///
    /// Returns [`WarehouseError::EmptyResult`] when the query yields no rows.
    async fn query_scalar(&self, sql: &str) -> Result<Scalar, WarehouseError>;

    /// Bulk-load an entire source into a table in one operation.
    async fn copy_from(&self, spec: &CopySpec) -> Result<u64, WarehouseError>;
}

/// Which backend to open and how to reach it.
#[derive(Debug, Clone)]
pub enum WarehouseSettings {
    Sqlite { path: PathBuf },
    Redshift(RedshiftConnectionSettings),
}

impl WarehouseSettings {
    pub fn dialect(&self) -> Dialect {
        match self {
            WarehouseSettings::Sqlite { .. } => Dialect::Sqlite,
            WarehouseSettings::Redshift(_) => Dialect::Redshift,
        }
    }
}

/// Open the configured backend.
pub async fn connect(settings: &WarehouseSettings) -> Result<Arc<dyn Warehouse>, WarehouseError> {
    match settings {
        WarehouseSettings::Sqlite { path } => Ok(Arc::new(SqliteWarehouse::open(path)?)),
        WarehouseSettings::Redshift(redshift) => {
            Ok(Arc::new(RedshiftWarehouse::connect(redshift).await?))
        }
    }
}
