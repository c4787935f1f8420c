//! Song/log JSON to partitioned Parquet tables.

mod batches;
mod calendar;
mod job;
mod reader;
mod records;
mod tables;
mod writer;

pub use calendar::TimeParts;
pub use job::{LakeJob, LakeReport, TableReport};
pub use reader::read_json_records;
pub use records::{LogRecord, SongRecord};
pub use tables::{
    artists_table, next_song_events, songplays_table, songs_table, time_table, users_table,
    ArtistRow, SongRow, SongplayRow, TimeRow, UserRow,
};
pub use writer::{write_table, HIVE_DEFAULT_PARTITION, SUCCESS_MARKER};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LakeSettings {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

#[derive(Debug, Error)]
pub enum LakeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to walk input directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Input path does not exist: {0:?}")]
    MissingInput(PathBuf),

    #[error("Unsupported path {0}: only local paths are supported")]
    UnsupportedPath(String),
}
