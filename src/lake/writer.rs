//! Hive-layout Parquet output.

use super::LakeError;
use arrow::array::{Array, UInt32Array};
use arrow::compute::take_record_batch;
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Directory name used for a null partition value.
pub const HIVE_DEFAULT_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

/// Empty file marking a completed table write.
pub const SUCCESS_MARKER: &str = "_SUCCESS";

fn writer_properties() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Percent-encode the characters Hive does not allow in a path segment.
fn escape_partition_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_control() || "\"#%'*/:=?\\{[]^".contains(c) {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                escaped.push_str(&format!("%{:02X}", b));
            }
        } else {
            escaped.push(c);
        }
    }
    escaped
}

fn partition_path(
    batch: &RecordBatch,
    columns: &[usize],
    row: usize,
) -> Result<PathBuf, LakeError> {
    let mut path = PathBuf::new();
    for &idx in columns {
        let name = batch.schema().field(idx).name().clone();
        let array = batch.column(idx);
        let value = if array.is_null(row) {
            HIVE_DEFAULT_PARTITION.to_string()
        } else {
            escape_partition_value(&array_value_to_string(array, row)?)
        };
        path.push(format!("{}={}", name, value));
    }
    Ok(path)
}

fn write_file(dir: &Path, batch: &RecordBatch) -> Result<PathBuf, LakeError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("part-00000-{}.snappy.parquet", Uuid::new_v4()));
    let file = File::create(&path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(writer_properties()))?;
    writer.write(batch)?;
    writer.close()?;
    debug!("Wrote {} rows to {:?}", batch.num_rows(), path);
    Ok(path)
}

/// Write `batch` to `table_dir`, replacing anything already there.
///
/// Rows are split into `key=value` directories by `partition_by`; the
/// partition columns are not repeated inside the files. Returns the paths of
/// the data files written.
pub fn write_table(
    table_dir: &Path,
    batch: &RecordBatch,
    partition_by: &[&str],
) -> Result<Vec<PathBuf>, LakeError> {
    if table_dir.exists() {
        info!("Removing previous output at {:?}", table_dir);
        std::fs::remove_dir_all(table_dir)?;
    }
    std::fs::create_dir_all(table_dir)?;

    let schema = batch.schema();
    let partition_columns = partition_by
        .iter()
        .map(|name| schema.index_of(name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut files = Vec::new();
    if partition_columns.is_empty() {
        files.push(write_file(table_dir, batch)?);
    } else {
        let data_columns: Vec<usize> = (0..schema.fields().len())
            .filter(|idx| !partition_columns.contains(idx))
            .collect();

        let mut groups: BTreeMap<PathBuf, Vec<u32>> = BTreeMap::new();
        for row in 0..batch.num_rows() {
            groups
                .entry(partition_path(batch, &partition_columns, row)?)
                .or_default()
                .push(row as u32);
        }

        for (relative, rows) in groups {
            let partition = take_record_batch(batch, &UInt32Array::from(rows))?;
            let data = partition.project(&data_columns)?;
            files.push(write_file(&table_dir.join(relative), &data)?);
        }
    }

    File::create(table_dir.join(SUCCESS_MARKER))?;
    info!(
        "Wrote {} rows in {} files to {:?}",
        batch.num_rows(),
        files.len(),
        table_dir
    );
    Ok(files)
}
