//! Staging load task.

use super::{Task, TaskContext, TaskError};
use crate::warehouse::CopySpec;
use async_trait::async_trait;
use tracing::info;

/// Empties a staging table and bulk-copies its source into it.
pub struct StageTask {
    id: String,
    spec: CopySpec,
}

impl StageTask {
    pub fn new(id: impl Into<String>, spec: CopySpec) -> Self {
        Self {
            id: id.into(),
            spec,
        }
    }
}

#[async_trait]
impl Task for StageTask {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &'static str {
        "stage"
    }

    fn description(&self) -> String {
        format!("Copy {} into {}", self.spec.source, self.spec.table)
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<(), TaskError> {
        if ctx.is_cancelled() {
            return Err(TaskError::Cancelled);
        }

        info!("Clearing staging table {}", self.spec.table);
        ctx.warehouse
            .execute(&format!("DELETE FROM {};", self.spec.table))
            .await?;

        let rows = ctx.warehouse.copy_from(&self.spec).await?;
        info!("Staged {} rows into {}", rows, self.spec.table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::test_support::RecordingWarehouse;
    use crate::warehouse::JsonFormat;
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn test_stage_clears_then_copies() {
        let warehouse = Arc::new(RecordingWarehouse::default());
        let ctx = TaskContext::new(CancellationToken::new(), warehouse.clone());
        let task = StageTask::new(
            "stage_songs",
            CopySpec::new("staging_songs", "data/song_data", JsonFormat::Auto),
        );

        task.execute(&ctx).await.unwrap();
        assert_eq!(
            warehouse.calls(),
            vec![
                "DELETE FROM staging_songs;",
                "COPY staging_songs FROM data/song_data"
            ]
        );
    }
}
