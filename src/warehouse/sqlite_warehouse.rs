use super::copy::{CopySpec, JsonFormat};
use super::json_path::{parse_jsonpaths_file, JsonPath};
use super::{Scalar, Warehouse, WarehouseError};
use crate::sql::Dialect;
use async_trait::async_trait;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Local warehouse backed by a single SQLite database file.
///
/// Foreign keys are left unenforced, matching Redshift where they are
/// informational only.
pub struct SqliteWarehouse {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteWarehouse {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, WarehouseError> {
        let path = db_path.as_ref();
        info!("Opening SQLite warehouse at {:?}", path);
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, WarehouseError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, WarehouseError> {
        // The bundled build enforces foreign keys by default; the fact table
        // loads before its dimensions.
        conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        // A poisoned lock only means another statement panicked; the
        // connection itself is still usable.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, WarehouseError> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", table))?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        if columns.is_empty() {
            return Err(WarehouseError::Unsupported(format!(
                "Table {} does not exist",
                table
            )));
        }
        Ok(columns)
    }
}

/// Collect every `.json` file at `source`, recursing into directories.
fn json_files(source: &Path) -> Result<Vec<PathBuf>, WarehouseError> {
    if source.is_file() {
        return Ok(vec![source.to_path_buf()]);
    }
    if !source.is_dir() {
        return Err(WarehouseError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Copy source not found: {:?}", source),
        )));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| WarehouseError::Io(e.into()))?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "json")
        {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Read one file holding either a single JSON document or newline-delimited records.
fn read_records(path: &Path) -> Result<Vec<JsonValue>, WarehouseError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::Deserializer::from_str(&content)
        .into_iter::<JsonValue>()
        .map(|r| r.map_err(WarehouseError::from))
        .collect()
}

fn to_sql_value(value: Option<&JsonValue>) -> SqlValue {
    match value {
        None | Some(JsonValue::Null) => SqlValue::Null,
        Some(JsonValue::Bool(b)) => SqlValue::Integer(*b as i64),
        Some(JsonValue::Number(n)) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map(SqlValue::Real).unwrap_or(SqlValue::Null),
        },
        Some(JsonValue::String(s)) => SqlValue::Text(s.clone()),
        Some(other) => SqlValue::Text(other.to_string()),
    }
}

enum ColumnMapping {
    Auto(Vec<String>),
    Paths(Vec<JsonPath>),
}

impl ColumnMapping {
    fn row(&self, record: &JsonValue) -> Vec<SqlValue> {
        match self {
            ColumnMapping::Auto(columns) => {
                let lowered: HashMap<String, &JsonValue> = record
                    .as_object()
                    .map(|obj| obj.iter().map(|(k, v)| (k.to_lowercase(), v)).collect())
                    .unwrap_or_default();
                columns
                    .iter()
                    .map(|c| to_sql_value(lowered.get(&c.to_lowercase()).copied()))
                    .collect()
            }
            ColumnMapping::Paths(paths) => paths
                .iter()
                .map(|p| to_sql_value(p.select(record)))
                .collect(),
        }
    }
}

#[async_trait]
impl Warehouse for SqliteWarehouse {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn execute(&self, sql: &str) -> Result<u64, WarehouseError> {
        let conn = self.lock();
        let changed = conn.execute(sql, [])?;
        Ok(changed as u64)
    }

    async fn query_scalar(&self, sql: &str) -> Result<Scalar, WarehouseError> {
        let conn = self.lock();
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let row = rows
            .next()?
            .ok_or_else(|| WarehouseError::EmptyResult(sql.to_string()))?;
        let scalar = match row.get_ref(0)? {
            ValueRef::Null => Scalar::Null,
            ValueRef::Integer(i) => Scalar::Integer(i),
            ValueRef::Real(r) => Scalar::Real(r),
            ValueRef::Text(t) => Scalar::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(_) => {
                return Err(WarehouseError::Unsupported(
                    "BLOB values cannot be compared".to_string(),
                ))
            }
        };
        Ok(scalar)
    }

    async fn copy_from(&self, spec: &CopySpec) -> Result<u64, WarehouseError> {
        let files = json_files(Path::new(&spec.source))?;
        let mut conn = self.lock();
        let columns = Self::table_columns(&conn, spec.table)?;

        let mapping = match &spec.format {
            JsonFormat::Auto => ColumnMapping::Auto(columns.clone()),
            JsonFormat::Paths(location) => {
                let paths = parse_jsonpaths_file(&std::fs::read_to_string(location)?)?;
                if paths.len() != columns.len() {
                    return Err(WarehouseError::InvalidJsonPath(format!(
                        "{} lists {} paths but {} has {} columns",
                        location,
                        paths.len(),
                        spec.table,
                        columns.len()
                    )));
                }
                ColumnMapping::Paths(paths)
            }
        };

        let placeholders = vec!["?"; columns.len()].join(", ");
        let insert_sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            spec.table,
            columns.join(", "),
            placeholders
        );

        let tx = conn.transaction()?;
        let mut loaded = 0u64;
        {
            let mut stmt = tx.prepare(&insert_sql)?;
            for file in &files {
                let records = read_records(file)?;
                debug!("Copying {} records from {:?}", records.len(), file);
                for record in &records {
                    stmt.execute(params_from_iter(mapping.row(record)))?;
                    loaded += 1;
                }
            }
        }
        tx.commit()?;

        info!(
            "Copied {} rows from {} files into {}",
            loaded,
            files.len(),
            spec.table
        );
        Ok(loaded)
    }
}
