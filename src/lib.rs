//! Sparkify Warehouse Library
//!
//! Staging, fact/dimension loading and data quality checks for the Sparkify
//! star schema, plus the JSON to Parquet lake job.

pub mod config;
pub mod lake;
pub mod pipeline;
pub mod sql;
pub mod tasks;
pub mod warehouse;

// Re-export commonly used types for convenience
pub use pipeline::{build_sparkify_pipeline, Pipeline, PipelineReport};
pub use sql::{Dialect, SqlCatalog, StagingSources};
pub use tasks::{Task, TaskContext, TaskError};
pub use warehouse::{SqliteWarehouse, Warehouse, WarehouseError};
