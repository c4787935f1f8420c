use crate::tasks::{Task, TaskContext, TaskError};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Task {0} is already registered")]
    DuplicateTask(String),

    #[error("Unknown task {0}")]
    UnknownTask(String),

    #[error("Task {task} depends on unknown task {upstream}")]
    UnknownDependency { task: String, upstream: String },

    #[error("Dependency cycle between tasks: {0:?}")]
    Cycle(Vec<String>),
}

/// Final state of one task in a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRunStatus {
    Succeeded,
    Failed(String),
    /// Not run because an upstream task did not succeed.
    UpstreamFailed,
    Cancelled,
}

impl TaskRunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskRunStatus::Succeeded => "success",
            TaskRunStatus::Failed(_) => "failed",
            TaskRunStatus::UpstreamFailed => "upstream_failed",
            TaskRunStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskRun {
    pub task_id: String,
    pub status: TaskRunStatus,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub pipeline_id: String,
    pub runs: Vec<TaskRun>,
}

impl PipelineReport {
    pub fn is_success(&self) -> bool {
        self.runs
            .iter()
            .all(|r| r.status == TaskRunStatus::Succeeded)
    }

    pub fn status_of(&self, task_id: &str) -> Option<&TaskRunStatus> {
        self.runs
            .iter()
            .find(|r| r.task_id == task_id)
            .map(|r| &r.status)
    }
}

struct PipelineNode {
    task: Arc<dyn Task>,
    upstream: Vec<String>,
}

/// A set of tasks wired together by upstream dependencies.
pub struct Pipeline {
    id: String,
    nodes: Vec<PipelineNode>,
}

impl Pipeline {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nodes: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Register a task that runs after every task in `upstream`.
    ///
    /// Upstream tasks must already be registered, so registration order is
    /// always a valid execution order.
    pub fn add_task(
        &mut self,
        task: Arc<dyn Task>,
        upstream: &[&str],
    ) -> Result<(), PipelineError> {
        let task_id = task.id().to_string();
        if self.nodes.iter().any(|n| n.task.id() == task_id) {
            return Err(PipelineError::DuplicateTask(task_id));
        }
        for dep in upstream {
            if !self.nodes.iter().any(|n| n.task.id() == *dep) {
                return Err(PipelineError::UnknownDependency {
                    task: task_id,
                    upstream: dep.to_string(),
                });
            }
        }
        info!("Registering task: {} - {}", task_id, task.description());
        self.nodes.push(PipelineNode {
            task,
            upstream: upstream.iter().map(|s| s.to_string()).collect(),
        });
        Ok(())
    }

    /// Add a dependency edge between two registered tasks.
    pub fn set_upstream(&mut self, task_id: &str, upstream: &str) -> Result<(), PipelineError> {
        if !self.nodes.iter().any(|n| n.task.id() == upstream) {
            return Err(PipelineError::UnknownDependency {
                task: task_id.to_string(),
                upstream: upstream.to_string(),
            });
        }
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.task.id() == task_id)
            .ok_or_else(|| PipelineError::UnknownTask(task_id.to_string()))?;
        if !node.upstream.iter().any(|u| u == upstream) {
            node.upstream.push(upstream.to_string());
        }
        Ok(())
    }

    /// Task ids in execution order.
    ///
    /// Among tasks whose dependencies are satisfied, registration order wins.
    pub fn execution_order(&self) -> Result<Vec<String>, PipelineError> {
        let mut done: HashSet<&str> = HashSet::new();
        let mut order = Vec::with_capacity(self.nodes.len());

        while order.len() < self.nodes.len() {
            let next = self.nodes.iter().find(|n| {
                !done.contains(n.task.id())
                    && n.upstream.iter().all(|u| done.contains(u.as_str()))
            });
            match next {
                Some(node) => {
                    done.insert(node.task.id());
                    order.push(node.task.id().to_string());
                }
                None => {
                    let stuck = self
                        .nodes
                        .iter()
                        .map(|n| n.task.id())
                        .filter(|id| !done.contains(id))
                        .map(|id| id.to_string())
                        .collect();
                    return Err(PipelineError::Cycle(stuck));
                }
            }
        }
        Ok(order)
    }

    /// Run every task once, in dependency order.
    pub async fn run(&self, ctx: &TaskContext) -> Result<PipelineReport, PipelineError> {
        let order = self.execution_order()?;
        let nodes: HashMap<&str, &PipelineNode> =
            self.nodes.iter().map(|n| (n.task.id(), n)).collect();
        let mut statuses: HashMap<String, TaskRunStatus> = HashMap::new();
        let mut runs = Vec::with_capacity(order.len());

        info!("Starting pipeline {} with {} tasks", self.id, order.len());

        for task_id in &order {
            let node = nodes[task_id.as_str()];
            let started = Instant::now();

            let status = if ctx.is_cancelled() {
                TaskRunStatus::Cancelled
            } else if node
                .upstream
                .iter()
                .any(|u| statuses.get(u) != Some(&TaskRunStatus::Succeeded))
            {
                warn!("Skipping task {}: upstream did not succeed", task_id);
                TaskRunStatus::UpstreamFailed
            } else {
                info!("Running task {} ({})", task_id, node.task.kind());
                match node.task.execute(ctx).await {
                    Ok(()) => {
                        info!(
                            "Task {} completed in {}ms",
                            task_id,
                            started.elapsed().as_millis()
                        );
                        TaskRunStatus::Succeeded
                    }
                    Err(TaskError::Cancelled) => {
                        warn!("Task {} was cancelled", task_id);
                        TaskRunStatus::Cancelled
                    }
                    Err(e) => {
                        error!("Task {} failed: {}", task_id, e);
                        TaskRunStatus::Failed(e.to_string())
                    }
                }
            };

            statuses.insert(task_id.clone(), status.clone());
            runs.push(TaskRun {
                task_id: task_id.clone(),
                status,
                duration: started.elapsed(),
            });
        }

        let report = PipelineReport {
            pipeline_id: self.id.clone(),
            runs,
        };
        if report.is_success() {
            info!("Pipeline {} succeeded", self.id);
        } else {
            error!("Pipeline {} did not complete successfully", self.id);
        }
        Ok(report)
    }
}
