use crate::warehouse::Warehouse;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Context provided to tasks during execution.
#[derive(Clone)]
pub struct TaskContext {
    /// Token to check for cancellation requests.
    pub cancellation_token: CancellationToken,

    /// Connection to the target warehouse.
    pub warehouse: Arc<dyn Warehouse>,
}

impl TaskContext {
    pub fn new(cancellation_token: CancellationToken, warehouse: Arc<dyn Warehouse>) -> Self {
        Self {
            cancellation_token,
            warehouse,
        }
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }
}
