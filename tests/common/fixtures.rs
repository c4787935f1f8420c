//! Test fixture creation for datasets and warehouses

use super::constants::*;
use sparkify_warehouse::sql::{Dialect, SqlCatalog, StagingSources};
use sparkify_warehouse::warehouse::{run_batch, ErrorPolicy, Scalar, SqliteWarehouse, Warehouse};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Song and log JSON laid out like the public dataset, in a temp directory.
pub struct TestDataset {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TestDataset {
    pub fn create() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let root = dir.path();

        for (relative, content) in SONG_FILES {
            write_file(&root.join("song_data").join(relative), content);
        }
        write_file(&root.join("log_data").join(EVENTS_FILE), &events_ndjson());
        write_file(&root.join("log_json_path.json"), JSONPATHS);

        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn song_data(&self) -> PathBuf {
        self.root().join("song_data")
    }

    pub fn log_data(&self) -> PathBuf {
        self.root().join("log_data")
    }

    /// Staging sources; `with_jsonpaths` maps event columns through the
    /// JSONPaths file instead of by key name.
    pub fn staging_sources(&self, with_jsonpaths: bool) -> StagingSources {
        StagingSources {
            log_data: self.log_data().to_string_lossy().to_string(),
            log_jsonpath: with_jsonpaths.then(|| {
                self.root()
                    .join("log_json_path.json")
                    .to_string_lossy()
                    .to_string()
            }),
            song_data: self.song_data().to_string_lossy().to_string(),
        }
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture dir");
    }
    fs::write(path, content).expect("Failed to write fixture file");
}

/// SQLite warehouse in a temp directory.
pub struct TestWarehouse {
    pub warehouse: Arc<SqliteWarehouse>,
    pub catalog: SqlCatalog,
    _dir: TempDir,
}

#[allow(dead_code)]
impl TestWarehouse {
    pub fn empty() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let warehouse = SqliteWarehouse::open(dir.path().join("sparkify.db"))
            .expect("Failed to open SQLite warehouse");
        Self {
            warehouse: Arc::new(warehouse),
            catalog: SqlCatalog::new(Dialect::Sqlite),
            _dir: dir,
        }
    }

    /// A warehouse with every table created.
    pub async fn with_tables() -> Self {
        let test = Self::empty();
        for (name, statements) in [
            ("drop_tables", test.catalog.drop_tables()),
            ("create_tables", test.catalog.create_tables()),
        ] {
            let report = run_batch(
                test.warehouse.as_ref(),
                name,
                &statements,
                ErrorPolicy::FailFast,
            )
            .await
            .expect("Failed to create tables");
            assert!(report.is_complete());
        }
        test
    }

    pub async fn count(&self, table: &str) -> i64 {
        match self
            .warehouse
            .query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .await
            .expect("Count query failed")
        {
            Scalar::Integer(n) => n,
            other => panic!("Unexpected count {:?}", other),
        }
    }

    pub async fn scalar(&self, sql: &str) -> Scalar {
        self.warehouse
            .query_scalar(sql)
            .await
            .expect("Scalar query failed")
    }
}
