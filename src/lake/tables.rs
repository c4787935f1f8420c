//! Row-level derivation of the five lake tables.

use super::{LogRecord, SongRecord, TimeParts};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq)]
pub struct SongRow {
    pub song_id: Option<String>,
    pub title: Option<String>,
    pub artist_id: Option<String>,
    pub year: Option<i64>,
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRow {
    pub artist_id: Option<String>,
    pub artist_name: Option<String>,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserRow {
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

pub type TimeRow = TimeParts;

#[derive(Debug, Clone, PartialEq)]
pub struct SongplayRow {
    pub songplay_id: i64,
    pub start_time: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
    pub level: Option<String>,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

/// Floats compare by bit pattern so rows holding them can be deduplicated.
fn float_key(value: Option<f64>) -> Option<u64> {
    value.map(f64::to_bits)
}

/// Keep the first row for every distinct key, preserving input order.
fn distinct_by<T, K, F>(rows: impl IntoIterator<Item = T>, key: F) -> Vec<T>
where
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    rows.into_iter().filter(|row| seen.insert(key(row))).collect()
}

pub fn songs_table(songs: &[SongRecord]) -> Vec<SongRow> {
    let rows = songs.iter().map(|s| SongRow {
        song_id: s.song_id.clone(),
        title: s.title.clone(),
        artist_id: s.artist_id.clone(),
        year: s.year,
        duration: s.duration,
    });
    distinct_by(rows, |r| {
        (
            r.song_id.clone(),
            r.title.clone(),
            r.artist_id.clone(),
            r.year,
            float_key(r.duration),
        )
    })
}

pub fn artists_table(songs: &[SongRecord]) -> Vec<ArtistRow> {
    let rows = songs.iter().map(|s| ArtistRow {
        artist_id: s.artist_id.clone(),
        artist_name: s.artist_name.clone(),
        artist_location: s.artist_location.clone(),
        artist_latitude: s.artist_latitude,
        artist_longitude: s.artist_longitude,
    });
    distinct_by(rows, |r| {
        (
            r.artist_id.clone(),
            r.artist_name.clone(),
            r.artist_location.clone(),
            float_key(r.artist_latitude),
            float_key(r.artist_longitude),
        )
    })
}

pub fn next_song_events(events: &[LogRecord]) -> Vec<&LogRecord> {
    events.iter().filter(|e| e.is_song_play()).collect()
}

pub fn users_table(events: &[&LogRecord]) -> Vec<UserRow> {
    let rows = events.iter().map(|e| UserRow {
        user_id: e.user_id.clone(),
        first_name: e.first_name.clone(),
        last_name: e.last_name.clone(),
        gender: e.gender.clone(),
        level: e.level.clone(),
    });
    distinct_by(rows, |r| r.clone())
}

/// Events without a timestamp contribute no time row.
pub fn time_table(events: &[&LogRecord]) -> Vec<TimeRow> {
    let rows = events
        .iter()
        .filter_map(|e| e.ts.and_then(TimeParts::from_epoch_millis));
    distinct_by(rows, |r| *r)
}

struct SongMatch<'a> {
    song_id: Option<&'a str>,
    artist_id: Option<&'a str>,
}

/// Left join of song plays with the song catalogue on title and artist name.
///
/// An event matching several distinct songs yields one row per match; an
/// unmatched event keeps null song and artist ids. Ids count up from 0 in
/// output order.
pub fn songplays_table(events: &[&LogRecord], songs: &[SongRecord]) -> Vec<SongplayRow> {
    let catalogue = distinct_by(songs.iter(), |s| {
        (
            s.song_id.clone(),
            s.title.clone(),
            s.artist_id.clone(),
            s.artist_name.clone(),
        )
    });

    let mut by_title_artist: HashMap<(&str, &str), Vec<SongMatch<'_>>> = HashMap::new();
    for song in catalogue {
        if let (Some(title), Some(artist)) = (song.title.as_deref(), song.artist_name.as_deref()) {
            by_title_artist
                .entry((title, artist))
                .or_default()
                .push(SongMatch {
                    song_id: song.song_id.as_deref(),
                    artist_id: song.artist_id.as_deref(),
                });
        }
    }

    let mut rows = Vec::with_capacity(events.len());
    for event in events {
        let matches = match (event.song.as_deref(), event.artist.as_deref()) {
            (Some(song), Some(artist)) => by_title_artist.get(&(song, artist)),
            _ => None,
        };
        let start_time = event
            .ts
            .and_then(TimeParts::from_epoch_millis)
            .map(|t| t.start_time);

        let mut push = |song_id: Option<&str>, artist_id: Option<&str>| {
            rows.push(SongplayRow {
                songplay_id: rows.len() as i64,
                start_time,
                user_id: event.user_id.clone(),
                level: event.level.clone(),
                song_id: song_id.map(str::to_string),
                artist_id: artist_id.map(str::to_string),
                session_id: event.session_id,
                location: event.location.clone(),
                user_agent: event.user_agent.clone(),
            });
        };

        match matches {
            Some(found) => {
                for m in found {
                    push(m.song_id, m.artist_id);
                }
            }
            None => push(None, None),
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(song_id: &str, title: &str, artist_id: &str, artist_name: &str) -> SongRecord {
        SongRecord {
            num_songs: Some(1),
            artist_id: Some(artist_id.to_string()),
            artist_latitude: None,
            artist_longitude: None,
            artist_location: Some(String::new()),
            artist_name: Some(artist_name.to_string()),
            song_id: Some(song_id.to_string()),
            title: Some(title.to_string()),
            duration: Some(200.5),
            year: Some(2004),
        }
    }

    fn play(user: &str, level: &str, song: &str, artist: &str, ts: i64) -> LogRecord {
        serde_json::from_value(serde_json::json!({
            "userId": user,
            "firstName": "Lily",
            "lastName": "Koch",
            "gender": "F",
            "level": level,
            "page": "NextSong",
            "song": song,
            "artist": artist,
            "ts": ts,
            "sessionId": 818,
        }))
        .unwrap()
    }

    #[test]
    fn test_identical_songs_are_deduplicated() {
        let songs = vec![
            song("SOA", "Intro", "ARX", "Band"),
            song("SOA", "Intro", "ARX", "Band"),
            song("SOB", "Outro", "ARX", "Band"),
        ];
        assert_eq!(songs_table(&songs).len(), 2);
        assert_eq!(artists_table(&songs).len(), 1);
    }

    #[test]
    fn test_users_distinct_on_all_columns() {
        let events = vec![
            play("15", "free", "a", "b", 1542788207796),
            play("15", "free", "c", "d", 1542788208796),
            play("15", "paid", "c", "d", 1542788209796),
        ];
        let plays = next_song_events(&events);
        let users = users_table(&plays);
        // A level change is a distinct row, as a plain DISTINCT would keep it.
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn test_only_next_song_events_are_kept() {
        let mut home = play("15", "free", "a", "b", 1);
        home.page = Some("Home".to_string());
        let events = vec![home, play("15", "free", "a", "b", 2)];
        assert_eq!(next_song_events(&events).len(), 1);
    }

    #[test]
    fn test_time_rows_deduplicate_same_second() {
        let events = vec![
            play("1", "free", "a", "b", 1542788207100),
            play("2", "free", "a", "b", 1542788207900),
            play("3", "free", "a", "b", 1542788300000),
        ];
        let plays = next_song_events(&events);
        assert_eq!(time_table(&plays).len(), 2);
    }

    #[test]
    fn test_songplays_left_join() {
        let songs = vec![song("SOA", "Intro", "ARX", "Band")];
        let events = vec![
            play("1", "free", "Intro", "Band", 1542788207796),
            play("2", "paid", "Unknown", "Nobody", 1542788208796),
            play("3", "paid", "Intro", "Other Band", 1542788209796),
        ];
        let plays = next_song_events(&events);
        let rows = songplays_table(&plays, &songs);

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows.iter().map(|r| r.songplay_id).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(rows[0].song_id.as_deref(), Some("SOA"));
        assert_eq!(rows[0].artist_id.as_deref(), Some("ARX"));
        assert_eq!(rows[1].song_id, None);
        assert_eq!(rows[2].artist_id, None);
        assert_eq!(rows[1].session_id, Some(818));
        assert!(rows[0].start_time.is_some());
    }

    #[test]
    fn test_songplays_one_row_per_matching_song() {
        let songs = vec![
            song("SOA", "Intro", "ARX", "Band"),
            song("SOA", "Intro", "ARX", "Band"),
            song("SOC", "Intro", "ARY", "Band"),
        ];
        let events = vec![play("1", "free", "Intro", "Band", 1542788207796)];
        let plays = next_song_events(&events);
        let rows = songplays_table(&plays, &songs);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].songplay_id, 1);
    }
}
