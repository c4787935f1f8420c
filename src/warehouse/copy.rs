/// How JSON records map onto the columns of a staging table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonFormat {
    /// Match top-level keys to column names, ignoring case.
    Auto,
    /// Location of a JSONPaths file listing one path per column, in column order.
    Paths(String),
}

/// A bulk-copy request: load everything under `source` into `table`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySpec {
    pub table: &'static str,
    /// Object-storage URI on Redshift, local file or directory on SQLite.
    pub source: String,
    pub format: JsonFormat,
    /// Skip automatic compression analysis on load.
    pub compupdate_off: bool,
}

impl CopySpec {
    pub fn new(table: &'static str, source: impl Into<String>, format: JsonFormat) -> Self {
        Self {
            table,
            source: source.into(),
            format,
            compupdate_off: false,
        }
    }

    pub fn with_compupdate_off(mut self) -> Self {
        self.compupdate_off = true;
        self
    }
}
