//! Fact table load task.

use super::{Task, TaskContext, TaskError};
use crate::sql::{render_insert, InsertSelect};
use async_trait::async_trait;
use tracing::info;

/// Appends the rows of an insert-select to a fact table.
///
/// Fact tables are append-only: this task never deletes.
pub struct LoadFactTask {
    id: String,
    table: String,
    columns: Vec<String>,
    select_sql: String,
}

impl LoadFactTask {
    pub fn new(
        id: impl Into<String>,
        table: impl Into<String>,
        select_sql: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            table: table.into(),
            columns: Vec::new(),
            select_sql: select_sql.into(),
        }
    }

    pub fn from_insert(id: impl Into<String>, insert: &InsertSelect) -> Self {
        Self::new(id, insert.table, insert.select)
            .with_columns(insert.columns.iter().map(|c| c.to_string()).collect())
    }

    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }
}

#[async_trait]
impl Task for LoadFactTask {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &'static str {
        "load_fact"
    }

    fn description(&self) -> String {
        format!("Append rows to fact table {}", self.table)
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<(), TaskError> {
        if ctx.is_cancelled() {
            return Err(TaskError::Cancelled);
        }

        let sql = render_insert(&self.table, self.columns.as_slice(), &self.select_sql);
        let rows = ctx.warehouse.execute(&sql).await?;
        info!("Loaded {} rows into fact table {}", rows, self.table);
        Ok(())
    }
}
