//! Dimension table load task.

use super::{Task, TaskContext, TaskError};
use crate::sql::{render_insert, InsertSelect};
use async_trait::async_trait;
use tracing::info;

/// Loads a dimension table from an insert-select, optionally clearing it first.
pub struct LoadDimensionTask {
    id: String,
    table: String,
    columns: Vec<String>,
    select_sql: String,
    truncate: bool,
}

impl LoadDimensionTask {
    pub fn new(
        id: impl Into<String>,
        table: impl Into<String>,
        select_sql: impl Into<String>,
        truncate: bool,
    ) -> Self {
        Self {
            id: id.into(),
            table: table.into(),
            columns: Vec::new(),
            select_sql: select_sql.into(),
            truncate,
        }
    }

    pub fn from_insert(id: impl Into<String>, insert: &InsertSelect, truncate: bool) -> Self {
        Self::new(id, insert.table, insert.select, truncate)
            .with_columns(insert.columns.iter().map(|c| c.to_string()).collect())
    }

    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }
}

#[async_trait]
impl Task for LoadDimensionTask {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &'static str {
        "load_dimension"
    }

    fn description(&self) -> String {
        if self.truncate {
            format!("Clear and reload dimension table {}", self.table)
        } else {
            format!("Append rows to dimension table {}", self.table)
        }
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<(), TaskError> {
        if ctx.is_cancelled() {
            return Err(TaskError::Cancelled);
        }

        if self.truncate {
            info!("Clearing data from dimension table {}", self.table);
            ctx.warehouse
                .execute(&format!("DELETE FROM {};", self.table))
                .await?;
        }

        let sql = render_insert(&self.table, self.columns.as_slice(), &self.select_sql);
        let rows = ctx.warehouse.execute(&sql).await?;
        info!("Loaded {} rows into dimension table {}", rows, self.table);
        Ok(())
    }
}
