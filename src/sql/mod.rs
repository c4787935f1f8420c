//! The Sparkify star schema as SQL, rendered for each supported dialect.

mod redshift;
mod sqlite;

use crate::warehouse::{CopySpec, JsonFormat, Statement};
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;

pub const STAGING_EVENTS: &str = "staging_events";
pub const STAGING_SONGS: &str = "staging_songs";
pub const FACT_SONGPLAYS: &str = "fact_songplays";
pub const DIM_USERS: &str = "dim_users";
pub const DIM_SONGS: &str = "dim_songs";
pub const DIM_ARTISTS: &str = "dim_artists";
pub const DIM_TIME: &str = "dim_time";

/// SQL flavour spoken by a warehouse backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    Redshift,
    Sqlite,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Redshift => write!(f, "redshift"),
            Dialect::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Tables populated from staging data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetTable {
    Songplays,
    Users,
    Songs,
    Artists,
    Time,
}

impl TargetTable {
    /// Insert order used by the warehouse ETL.
    pub const ALL: [TargetTable; 5] = [
        TargetTable::Songplays,
        TargetTable::Users,
        TargetTable::Songs,
        TargetTable::Artists,
        TargetTable::Time,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            TargetTable::Songplays => FACT_SONGPLAYS,
            TargetTable::Users => DIM_USERS,
            TargetTable::Songs => DIM_SONGS,
            TargetTable::Artists => DIM_ARTISTS,
            TargetTable::Time => DIM_TIME,
        }
    }

    /// Natural key of a dimension, surrogate key of the fact table.
    pub fn key_column(&self) -> &'static str {
        match self {
            TargetTable::Songplays => "songplay_id",
            TargetTable::Users => "user_id",
            TargetTable::Songs => "song_id",
            TargetTable::Artists => "artist_id",
            TargetTable::Time => "start_time",
        }
    }

    pub fn is_fact(&self) -> bool {
        matches!(self, TargetTable::Songplays)
    }

    fn columns(&self) -> &'static [&'static str] {
        match self {
            TargetTable::Songplays => &[
                "start_time",
                "user_id",
                "level",
                "song_id",
                "artist_id",
                "session_id",
                "location",
                "user_agent",
            ],
            TargetTable::Users => &["user_id", "first_name", "last_name", "gender", "level"],
            TargetTable::Songs => &["song_id", "title", "artist_id", "year", "duration"],
            TargetTable::Artists => &["artist_id", "name", "location", "latitude", "longitude"],
            TargetTable::Time => &["start_time", "hour", "day", "week", "month", "year", "weekday"],
        }
    }
}

/// An `INSERT INTO <table> (<columns>) <select>` statement in parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertSelect {
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub select: &'static str,
}

impl InsertSelect {
    pub fn render(&self) -> String {
        render_insert(self.table, self.columns, self.select)
    }
}

/// Render an insert-select; an empty column list inserts positionally.
pub fn render_insert<S: AsRef<str>>(table: &str, columns: &[S], select: &str) -> String {
    if columns.is_empty() {
        format!("INSERT INTO {} {};", table, select.trim())
    } else {
        let columns: Vec<&str> = columns.iter().map(|c| c.as_ref()).collect();
        format!(
            "INSERT INTO {} ({}) {};",
            table,
            columns.join(", "),
            select.trim()
        )
    }
}

/// Where the raw datasets live for the bulk-copy batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingSources {
    pub log_data: String,
    /// JSONPaths file for the event log; `None` maps keys automatically.
    pub log_jsonpath: Option<String>,
    pub song_data: String,
}

impl StagingSources {
    pub fn events_copy(&self) -> CopySpec {
        let format = match &self.log_jsonpath {
            Some(path) => JsonFormat::Paths(path.clone()),
            None => JsonFormat::Auto,
        };
        CopySpec::new(STAGING_EVENTS, self.log_data.clone(), format)
    }

    pub fn songs_copy(&self) -> CopySpec {
        CopySpec::new(STAGING_SONGS, self.song_data.clone(), JsonFormat::Auto).with_compupdate_off()
    }
}

/// Every statement the warehouse scripts run, for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct SqlCatalog {
    dialect: Dialect,
}

const DROP_ORDER: [&str; 7] = [
    STAGING_EVENTS,
    STAGING_SONGS,
    FACT_SONGPLAYS,
    DIM_USERS,
    DIM_SONGS,
    DIM_ARTISTS,
    DIM_TIME,
];

impl SqlCatalog {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn drop_tables(&self) -> Vec<Statement> {
        DROP_ORDER
            .iter()
            .map(|table| {
                Statement::sql(
                    format!("drop {}", table),
                    format!("DROP TABLE IF EXISTS {};", table),
                )
            })
            .collect()
    }

    pub fn create_tables(&self) -> Vec<Statement> {
        let creates = match self.dialect {
            Dialect::Redshift => redshift::CREATE_TABLES,
            Dialect::Sqlite => sqlite::CREATE_TABLES,
        };
        creates
            .iter()
            .map(|(table, sql)| Statement::sql(format!("create {}", table), *sql))
            .collect()
    }

    pub fn copy_tables(&self, sources: &StagingSources) -> Vec<Statement> {
        vec![
            Statement::BulkCopy(sources.events_copy()),
            Statement::BulkCopy(sources.songs_copy()),
        ]
    }

    pub fn insert_select(&self, target: TargetTable) -> InsertSelect {
        let select = match self.dialect {
            Dialect::Redshift => redshift::select_for(target),
            Dialect::Sqlite => sqlite::select_for(target),
        };
        InsertSelect {
            table: target.table_name(),
            columns: target.columns(),
            select,
        }
    }

    pub fn insert_tables(&self) -> Vec<Statement> {
        TargetTable::ALL
            .iter()
            .map(|target| {
                Statement::sql(
                    format!("insert {}", target.table_name()),
                    self.insert_select(*target).render(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_sizes() {
        for dialect in [Dialect::Redshift, Dialect::Sqlite] {
            let catalog = SqlCatalog::new(dialect);
            assert_eq!(catalog.drop_tables().len(), 7);
            assert_eq!(catalog.create_tables().len(), 7);
            assert_eq!(catalog.insert_tables().len(), 5);
        }
    }

    #[test]
    fn test_fact_table_is_created_last() {
        for dialect in [Dialect::Redshift, Dialect::Sqlite] {
            let creates = SqlCatalog::new(dialect).create_tables();
            assert_eq!(creates.last().unwrap().label(), "create fact_songplays");
        }
    }

    #[test]
    fn test_render_insert() {
        let insert = SqlCatalog::new(Dialect::Sqlite).insert_select(TargetTable::Users);
        let sql = insert.render();
        assert!(sql.starts_with(
            "INSERT INTO dim_users (user_id, first_name, last_name, gender, level) SELECT"
        ));
        assert!(sql.ends_with(';'));

        let positional = render_insert::<&str>("dim_users", &[], "SELECT 1");
        assert_eq!(positional, "INSERT INTO dim_users SELECT 1;");
    }

    #[test]
    fn test_copy_specs() {
        let sources = StagingSources {
            log_data: "s3://udacity-dend/log_data".to_string(),
            log_jsonpath: Some("s3://udacity-dend/log_json_path.json".to_string()),
            song_data: "s3://udacity-dend/song_data".to_string(),
        };
        let events = sources.events_copy();
        assert_eq!(events.table, STAGING_EVENTS);
        assert!(!events.compupdate_off);
        assert!(matches!(events.format, JsonFormat::Paths(_)));

        let songs = sources.songs_copy();
        assert_eq!(songs.table, STAGING_SONGS);
        assert!(songs.compupdate_off);
        assert_eq!(songs.format, JsonFormat::Auto);
    }

    #[test]
    fn test_songplays_keep_unmatched_plays() {
        for dialect in [Dialect::Redshift, Dialect::Sqlite] {
            let insert = SqlCatalog::new(dialect).insert_select(TargetTable::Songplays);
            assert!(insert.select.contains("LEFT JOIN staging_songs"));
        }
    }

    #[test]
    fn test_redshift_songplays_filters_next_song() {
        let insert = SqlCatalog::new(Dialect::Redshift).insert_select(TargetTable::Songplays);
        assert!(insert.select.contains("WHERE e.page = 'NextSong'"));
        assert!(insert.select.contains("TIMESTAMP 'epoch'"));
    }
}
