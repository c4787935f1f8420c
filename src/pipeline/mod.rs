//! Dependency-ordered execution of warehouse tasks.

mod runner;
mod sparkify;

pub use runner::{Pipeline, PipelineError, PipelineReport, TaskRun, TaskRunStatus};
pub use sparkify::{build_sparkify_pipeline, PipelineSettings, DEFAULT_PIPELINE_ID};
