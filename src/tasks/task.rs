use super::context::TaskContext;
use crate::warehouse::{Scalar, WarehouseError};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during task execution.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),

    #[error("Data quality check failed for `{query}`: expected {expected}, got {actual}")]
    DataQuality {
        query: String,
        expected: Scalar,
        actual: Scalar,
    },

    #[error("Task was cancelled")]
    Cancelled,
}

/// A unit of warehouse work with a connection context and a result.
#[async_trait]
pub trait Task: Send + Sync {
    /// Unique identifier for this task within a pipeline.
    fn id(&self) -> &str;

    /// Kind of task, e.g. `load_fact`.
    fn kind(&self) -> &'static str;

    /// Description of what this task does.
    fn description(&self) -> String;

    /// Execute the task.
    ///
    /// Implementations should check `ctx.is_cancelled()` before touching the
    /// warehouse and return [`TaskError::Cancelled`] if set.
    async fn execute(&self, ctx: &TaskContext) -> Result<(), TaskError>;
}
