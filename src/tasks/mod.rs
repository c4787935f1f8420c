//! Load and check tasks run against the warehouse.
//!
//! Each task is an independent unit implementing [`Task`]; the pipeline
//! composes them through dependency declarations.

mod context;
mod data_quality;
mod load_dimension;
mod load_fact;
mod stage;
mod task;

pub use context::TaskContext;
pub use data_quality::{DataQualityCheck, DataQualityTask};
pub use load_dimension::LoadDimensionTask;
pub use load_fact::LoadFactTask;
pub use stage::StageTask;
pub use task::{Task, TaskError};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::sql::Dialect;
    use crate::warehouse::{CopySpec, Scalar, Warehouse, WarehouseError};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Warehouse double that records every call and replays canned results.
    #[derive(Default)]
    pub struct RecordingWarehouse {
        pub calls: Mutex<Vec<String>>,
        pub scalars: Mutex<VecDeque<Result<Scalar, WarehouseError>>>,
        pub fail_on: Option<&'static str>,
    }

    impl RecordingWarehouse {
        pub fn with_scalars(scalars: Vec<Result<Scalar, WarehouseError>>) -> Self {
            Self {
                scalars: Mutex::new(scalars.into()),
                ..Default::default()
            }
        }

        pub fn failing_on(fragment: &'static str) -> Self {
            Self {
                fail_on: Some(fragment),
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Warehouse for RecordingWarehouse {
        fn dialect(&self) -> Dialect {
            Dialect::Sqlite
        }

        async fn execute(&self, sql: &str) -> Result<u64, WarehouseError> {
            self.calls.lock().unwrap().push(sql.to_string());
            match self.fail_on {
                Some(fragment) if sql.contains(fragment) => {
                    Err(WarehouseError::Unsupported(format!("refused: {}", sql)))
                }
                _ => Ok(1),
            }
        }

        async fn query_scalar(&self, sql: &str) -> Result<Scalar, WarehouseError> {
            self.calls.lock().unwrap().push(sql.to_string());
            self.scalars
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(WarehouseError::EmptyResult(sql.to_string())))
        }

        async fn copy_from(&self, spec: &CopySpec) -> Result<u64, WarehouseError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("COPY {} FROM {}", spec.table, spec.source));
            Ok(0)
        }
    }
}
