use super::LakeError;
use serde::de::DeserializeOwned;
use serde_json::Deserializer;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

fn json_files(root: &Path) -> Result<Vec<PathBuf>, LakeError> {
    if !root.exists() {
        return Err(LakeError::MissingInput(root.to_path_buf()));
    }
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let is_json = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if entry.file_type().is_file() && is_json {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Read every `*.json` file under `root`.
///
/// A file may hold a single object or newline-delimited objects.
pub fn read_json_records<T: DeserializeOwned>(root: &Path) -> Result<Vec<T>, LakeError> {
    let files = json_files(root)?;
    let mut records = Vec::new();

    for path in &files {
        let content = std::fs::read_to_string(path)?;
        let before = records.len();
        for record in Deserializer::from_str(&content).into_iter::<T>() {
            let record = record.map_err(|source| LakeError::Json {
                path: path.clone(),
                source,
            })?;
            records.push(record);
        }
        debug!("Read {} records from {:?}", records.len() - before, path);
    }

    info!(
        "Loaded {} records from {} files under {:?}",
        records.len(),
        files.len(),
        root
    );
    Ok(records)
}
