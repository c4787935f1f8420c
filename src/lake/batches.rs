//! Arrow record batches for the lake tables.

use super::{ArtistRow, SongRow, SongplayRow, TimeRow, UserRow};
use arrow::array::{
    ArrayRef, Float64Array, Int32Array, Int64Array, StringArray, TimestampMicrosecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

fn timestamp_type() -> DataType {
    DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into()))
}

fn strings<'a>(values: impl Iterator<Item = &'a Option<String>>) -> ArrayRef {
    Arc::new(values.map(|v| v.as_deref()).collect::<StringArray>())
}

pub fn songs_batch(rows: &[SongRow]) -> Result<RecordBatch, ArrowError> {
    let schema: SchemaRef = Arc::new(Schema::new(vec![
        Field::new("song_id", DataType::Utf8, true),
        Field::new("title", DataType::Utf8, true),
        Field::new("artist_id", DataType::Utf8, true),
        Field::new("year", DataType::Int64, true),
        Field::new("duration", DataType::Float64, true),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            strings(rows.iter().map(|r| &r.song_id)),
            strings(rows.iter().map(|r| &r.title)),
            strings(rows.iter().map(|r| &r.artist_id)),
            Arc::new(rows.iter().map(|r| r.year).collect::<Int64Array>()),
            Arc::new(rows.iter().map(|r| r.duration).collect::<Float64Array>()),
        ],
    )
}

pub fn artists_batch(rows: &[ArtistRow]) -> Result<RecordBatch, ArrowError> {
    let schema: SchemaRef = Arc::new(Schema::new(vec![
        Field::new("artist_id", DataType::Utf8, true),
        Field::new("artist_name", DataType::Utf8, true),
        Field::new("artist_location", DataType::Utf8, true),
        Field::new("artist_latitude", DataType::Float64, true),
        Field::new("artist_longitude", DataType::Float64, true),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            strings(rows.iter().map(|r| &r.artist_id)),
            strings(rows.iter().map(|r| &r.artist_name)),
            strings(rows.iter().map(|r| &r.artist_location)),
            Arc::new(rows.iter().map(|r| r.artist_latitude).collect::<Float64Array>()),
            Arc::new(rows.iter().map(|r| r.artist_longitude).collect::<Float64Array>()),
        ],
    )
}

pub fn users_batch(rows: &[UserRow]) -> Result<RecordBatch, ArrowError> {
    let schema: SchemaRef = Arc::new(Schema::new(vec![
        Field::new("userId", DataType::Utf8, true),
        Field::new("firstName", DataType::Utf8, true),
        Field::new("lastName", DataType::Utf8, true),
        Field::new("gender", DataType::Utf8, true),
        Field::new("level", DataType::Utf8, true),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            strings(rows.iter().map(|r| &r.user_id)),
            strings(rows.iter().map(|r| &r.first_name)),
            strings(rows.iter().map(|r| &r.last_name)),
            strings(rows.iter().map(|r| &r.gender)),
            strings(rows.iter().map(|r| &r.level)),
        ],
    )
}

pub fn time_batch(rows: &[TimeRow]) -> Result<RecordBatch, ArrowError> {
    let schema: SchemaRef = Arc::new(Schema::new(vec![
        Field::new("start_time", timestamp_type(), false),
        Field::new("hour", DataType::Int32, false),
        Field::new("day", DataType::Int32, false),
        Field::new("week", DataType::Int32, false),
        Field::new("month", DataType::Int32, false),
        Field::new("year", DataType::Int32, false),
        Field::new("weekday", DataType::Int32, false),
    ]));
    let ints = |f: fn(&TimeRow) -> i32| -> ArrayRef {
        Arc::new(rows.iter().map(f).collect::<Int32Array>())
    };
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(
                TimestampMicrosecondArray::from(
                    rows.iter()
                        .map(|r| r.start_time.timestamp_micros())
                        .collect::<Vec<_>>(),
                )
                .with_timezone("UTC"),
            ),
            ints(|r| r.hour),
            ints(|r| r.day),
            ints(|r| r.week),
            ints(|r| r.month),
            ints(|r| r.year),
            ints(|r| r.weekday),
        ],
    )
}

pub fn songplays_batch(rows: &[SongplayRow]) -> Result<RecordBatch, ArrowError> {
    let schema: SchemaRef = Arc::new(Schema::new(vec![
        Field::new("songplay_id", DataType::Int64, false),
        Field::new("start_time", timestamp_type(), true),
        Field::new("userId", DataType::Utf8, true),
        Field::new("level", DataType::Utf8, true),
        Field::new("song_id", DataType::Utf8, true),
        Field::new("artist_id", DataType::Utf8, true),
        Field::new("sessionId", DataType::Int64, true),
        Field::new("location", DataType::Utf8, true),
        Field::new("userAgent", DataType::Utf8, true),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(rows.iter().map(|r| r.songplay_id).collect::<Int64Array>()),
            Arc::new(
                TimestampMicrosecondArray::from(
                    rows.iter()
                        .map(|r| r.start_time.map(|t| t.timestamp_micros()))
                        .collect::<Vec<_>>(),
                )
                .with_timezone("UTC"),
            ),
            strings(rows.iter().map(|r| &r.user_id)),
            strings(rows.iter().map(|r| &r.level)),
            strings(rows.iter().map(|r| &r.song_id)),
            strings(rows.iter().map(|r| &r.artist_id)),
            Arc::new(rows.iter().map(|r| r.session_id).collect::<Int64Array>()),
            strings(rows.iter().map(|r| &r.location)),
            strings(rows.iter().map(|r| &r.user_agent)),
        ],
    )
}
