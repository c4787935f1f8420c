use super::batches::{artists_batch, songplays_batch, songs_batch, time_batch, users_batch};
use super::tables::{
    artists_table, next_song_events, songplays_table, songs_table, time_table, users_table,
};
use super::writer::write_table;
use super::{read_json_records, LakeError, LakeSettings, LogRecord, SongRecord};
use arrow::record_batch::RecordBatch;
use std::path::{Path, PathBuf};
use tracing::info;

const OBJECT_STORE_SCHEMES: [&str; 3] = ["s3://", "s3a://", "s3n://"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub name: &'static str,
    pub path: PathBuf,
    pub rows: usize,
    pub files: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LakeReport {
    pub tables: Vec<TableReport>,
}

impl LakeReport {
    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.name == name)
    }
}

fn check_local(path: &Path) -> Result<(), LakeError> {
    let text = path.to_string_lossy();
    if OBJECT_STORE_SCHEMES
        .iter()
        .any(|scheme| text.to_ascii_lowercase().starts_with(scheme))
    {
        return Err(LakeError::UnsupportedPath(text.into_owned()));
    }
    Ok(())
}

/// Builds the five lake tables from `<input>/song_data` and `<input>/log_data`.
pub struct LakeJob {
    settings: LakeSettings,
}

impl LakeJob {
    pub fn new(settings: LakeSettings) -> Result<Self, LakeError> {
        check_local(&settings.input_path)?;
        check_local(&settings.output_path)?;
        Ok(Self { settings })
    }

    fn write(
        &self,
        name: &'static str,
        batch: RecordBatch,
        partition_by: &[&str],
        report: &mut LakeReport,
    ) -> Result<(), LakeError> {
        let path = self.settings.output_path.join(format!("{}.parquet", name));
        let files = write_table(&path, &batch, partition_by)?;
        info!("{} written: {} rows", name, batch.num_rows());
        report.tables.push(TableReport {
            name,
            path,
            rows: batch.num_rows(),
            files: files.len(),
        });
        Ok(())
    }

    /// Songs and artists; returns the song records for the songplays join.
    fn process_song_data(&self, report: &mut LakeReport) -> Result<Vec<SongRecord>, LakeError> {
        let songs: Vec<SongRecord> =
            read_json_records(&self.settings.input_path.join("song_data"))?;
        info!("Song data loaded: {} records", songs.len());

        let song_rows = songs_table(&songs);
        self.write(
            "song_table",
            songs_batch(&song_rows)?,
            &["year", "artist_id"],
            report,
        )?;

        let artist_rows = artists_table(&songs);
        self.write("artists_table", artists_batch(&artist_rows)?, &[], report)?;

        Ok(songs)
    }

    fn process_log_data(
        &self,
        songs: &[SongRecord],
        report: &mut LakeReport,
    ) -> Result<(), LakeError> {
        let events: Vec<LogRecord> =
            read_json_records(&self.settings.input_path.join("log_data"))?;
        let plays = next_song_events(&events);
        info!(
            "Log data loaded: {} events, {} song plays",
            events.len(),
            plays.len()
        );

        let user_rows = users_table(&plays);
        self.write("users_table", users_batch(&user_rows)?, &[], report)?;

        let time_rows = time_table(&plays);
        self.write("time_table", time_batch(&time_rows)?, &["year", "month"], report)?;

        let songplay_rows = songplays_table(&plays, songs);
        self.write(
            "songplays_table",
            songplays_batch(&songplay_rows)?,
            &[],
            report,
        )?;

        Ok(())
    }

    pub fn run(&self) -> Result<LakeReport, LakeError> {
        info!(
            "Starting lake job: {:?} -> {:?}",
            self.settings.input_path, self.settings.output_path
        );
        let mut report = LakeReport::default();
        let songs = self.process_song_data(&mut report)?;
        self.process_log_data(&songs, &mut report)?;
        info!("Lake job finished: {} tables written", report.tables.len());
        Ok(report)
    }
}
