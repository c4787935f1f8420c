use super::copy::CopySpec;
use super::{Warehouse, WarehouseError};
use clap::ValueEnum;
use serde::Deserialize;
use tracing::{error, info, warn};

/// What a batch does when one of its statements fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Abort the batch and return the error to the caller.
    #[default]
    FailFast,
    /// Log the error, skip the rest of the batch and report success.
    BestEffort,
}

/// One unit of work in a batch.
#[derive(Debug, Clone)]
pub enum Statement {
    Sql { label: String, sql: String },
    BulkCopy(CopySpec),
}

impl Statement {
    pub fn sql(label: impl Into<String>, sql: impl Into<String>) -> Self {
        Statement::Sql {
            label: label.into(),
            sql: sql.into(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Statement::Sql { label, .. } => label,
            Statement::BulkCopy(spec) => spec.table,
        }
    }

    async fn run(&self, warehouse: &dyn Warehouse) -> Result<u64, WarehouseError> {
        match self {
            Statement::Sql { sql, .. } => warehouse.execute(sql).await,
            Statement::BulkCopy(spec) => warehouse.copy_from(spec).await,
        }
    }
}

/// Outcome of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub name: String,
    pub executed: usize,
    pub skipped: usize,
    pub error: Option<String>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.skipped == 0
    }
}

/// Execute `statements` in order, committing each one, under `policy`.
pub async fn run_batch(
    warehouse: &dyn Warehouse,
    name: &str,
    statements: &[Statement],
    policy: ErrorPolicy,
) -> Result<BatchReport, WarehouseError> {
    info!("Running batch {} ({} statements)", name, statements.len());
    let mut executed = 0;

    for (index, statement) in statements.iter().enumerate() {
        match statement.run(warehouse).await {
            Ok(rows) => {
                executed += 1;
                info!("[{}] {} done ({} rows)", name, statement.label(), rows);
            }
            Err(e) => {
                error!("[{}] {} failed: {}", name, statement.label(), e);
                if policy == ErrorPolicy::FailFast {
                    return Err(e);
                }
                let skipped = statements.len() - index - 1;
                if skipped > 0 {
                    warn!("[{}] skipping {} remaining statements", name, skipped);
                }
                return Ok(BatchReport {
                    name: name.to_string(),
                    executed,
                    skipped,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    Ok(BatchReport {
        name: name.to_string(),
        executed,
        skipped: 0,
        error: None,
    })
}
