//! Data quality check task.
//!
//! Runs scalar queries against the warehouse and compares each result with
//! an expected value. A mismatch fails the task at once; a query that cannot
//! be executed is logged and skipped so the remaining checks still run.

use super::{Task, TaskContext, TaskError};
use crate::sql::TargetTable;
use crate::warehouse::Scalar;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info, warn};

/// A single assertion: `sql_query` must return `expected_result`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataQualityCheck {
    pub sql_query: String,
    pub expected_result: Scalar,
}

impl DataQualityCheck {
    pub fn new(sql_query: impl Into<String>, expected_result: impl Into<Scalar>) -> Self {
        Self {
            sql_query: sql_query.into(),
            expected_result: expected_result.into(),
        }
    }

    /// Checks that no dimension holds a row with a null key.
    pub fn null_key_checks() -> Vec<DataQualityCheck> {
        TargetTable::ALL
            .iter()
            .filter(|t| !t.is_fact())
            .map(|t| {
                DataQualityCheck::new(
                    format!(
                        "SELECT COUNT(*) FROM {} WHERE {} IS NULL",
                        t.table_name(),
                        t.key_column()
                    ),
                    0,
                )
            })
            .collect()
    }
}

pub struct DataQualityTask {
    id: String,
    checks: Vec<DataQualityCheck>,
}

impl DataQualityTask {
    pub fn new(id: impl Into<String>, checks: Vec<DataQualityCheck>) -> Self {
        Self {
            id: id.into(),
            checks,
        }
    }
}

#[async_trait]
impl Task for DataQualityTask {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &'static str {
        "data_quality"
    }

    fn description(&self) -> String {
        format!("Run {} data quality checks", self.checks.len())
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<(), TaskError> {
        if self.checks.is_empty() {
            info!("No data quality checks were specified, nothing to do");
            return Ok(());
        }

        for check in &self.checks {
            if ctx.is_cancelled() {
                return Err(TaskError::Cancelled);
            }

            info!("Running data quality check: {}", check.sql_query);
            let actual = match ctx.warehouse.query_scalar(&check.sql_query).await {
                Ok(actual) => actual,
                Err(e) => {
                    warn!(
                        "Data quality query failed, skipping check `{}`: {}",
                        check.sql_query, e
                    );
                    continue;
                }
            };

            if !actual.matches(&check.expected_result) {
                error!(
                    "Data quality check failed: expected {}, got {}",
                    check.expected_result, actual
                );
                return Err(TaskError::DataQuality {
                    query: check.sql_query.clone(),
                    expected: check.expected_result.clone(),
                    actual,
                });
            }
        }

        info!("All {} data quality checks passed", self.checks.len());
        Ok(())
    }
}
