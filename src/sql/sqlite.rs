//! SQLite rendering of the schema, used for local runs and tests.
//!
//! SQLite enforces primary keys (Redshift does not), so the users and artists
//! selects keep a single row per key instead of relying on `DISTINCT`.

use super::TargetTable;

pub(super) const CREATE_TABLES: [(&str, &str); 7] = [
    (
        super::STAGING_EVENTS,
        "CREATE TABLE IF NOT EXISTS staging_events (
            artist          TEXT,
            auth            TEXT,
            firstName       TEXT,
            gender          TEXT,
            itemInSession   INTEGER,
            lastName        TEXT,
            length          TEXT,
            level           TEXT,
            location        TEXT,
            method          TEXT,
            page            TEXT,
            registration    TEXT,
            sessionId       INTEGER,
            song            TEXT,
            status          INTEGER,
            ts              INTEGER,
            userAgent       TEXT,
            userId          INTEGER
        );",
    ),
    (
        super::STAGING_SONGS,
        "CREATE TABLE IF NOT EXISTS staging_songs (
            num_songs          INTEGER,
            artist_id          TEXT,
            artist_latitude    TEXT,
            artist_longitude   TEXT,
            artist_location    TEXT,
            artist_name        TEXT,
            song_id            TEXT,
            title              TEXT,
            duration           TEXT,
            year               INTEGER
        );",
    ),
    (
        super::DIM_USERS,
        "CREATE TABLE IF NOT EXISTS dim_users (
            user_id      INTEGER   NOT NULL   PRIMARY KEY,
            first_name   TEXT      NOT NULL,
            last_name    TEXT      NOT NULL,
            gender       TEXT,
            level        TEXT      NOT NULL
        );",
    ),
    (
        super::DIM_ARTISTS,
        "CREATE TABLE IF NOT EXISTS dim_artists (
            artist_id   TEXT   NOT NULL   PRIMARY KEY,
            name        TEXT   NOT NULL,
            location    TEXT,
            latitude    REAL,
            longitude   REAL
        );",
    ),
    (
        super::DIM_SONGS,
        "CREATE TABLE IF NOT EXISTS dim_songs (
            song_id     TEXT      NOT NULL   PRIMARY KEY,
            title       TEXT      NOT NULL,
            artist_id   TEXT      NOT NULL   REFERENCES dim_artists(artist_id),
            year        INTEGER,
            duration    REAL
        );",
    ),
    (
        super::DIM_TIME,
        "CREATE TABLE IF NOT EXISTS dim_time (
            start_time   TEXT      NOT NULL   PRIMARY KEY,
            hour         INTEGER   NOT NULL,
            day          INTEGER   NOT NULL,
            week         INTEGER   NOT NULL,
            month        INTEGER   NOT NULL,
            year         INTEGER   NOT NULL,
            weekday      INTEGER   NOT NULL
        );",
    ),
    (
        super::FACT_SONGPLAYS,
        "CREATE TABLE IF NOT EXISTS fact_songplays (
            songplay_id   INTEGER   PRIMARY KEY AUTOINCREMENT,
            start_time    TEXT      NOT NULL   REFERENCES dim_time(start_time),
            user_id       INTEGER   NOT NULL   REFERENCES dim_users(user_id),
            level         TEXT      NOT NULL,
            song_id       TEXT      REFERENCES dim_songs(song_id),
            artist_id     TEXT      REFERENCES dim_artists(artist_id),
            session_id    INTEGER,
            location      TEXT,
            user_agent    TEXT
        );",
    ),
];

const SONGPLAYS_SELECT: &str = "
    SELECT datetime(e.ts / 1000, 'unixepoch'),
           e.userId,
           e.level,
           s.song_id,
           s.artist_id,
           e.sessionId,
           e.location,
           e.userAgent
    FROM staging_events AS e
    LEFT JOIN staging_songs AS s
      ON e.song = s.title
     AND e.artist = s.artist_name
    WHERE e.page = 'NextSong'";

// Bare columns next to MAX() come from the row holding the maximum, so each
// user keeps the level of their latest play.
const USERS_SELECT: &str = "
    SELECT userId, firstName, lastName, gender, level
    FROM (
        SELECT userId, firstName, lastName, gender, level, MAX(ts) AS last_ts
        FROM staging_events
        WHERE page = 'NextSong' AND userId IS NOT NULL
        GROUP BY userId
    )";

const SONGS_SELECT: &str = "
    SELECT song_id, title, artist_id, year, CAST(duration AS REAL)
    FROM staging_songs
    WHERE song_id IS NOT NULL
    GROUP BY song_id";

const ARTISTS_SELECT: &str = "
    SELECT artist_id,
           artist_name,
           artist_location,
           CAST(artist_latitude AS REAL),
           CAST(artist_longitude AS REAL)
    FROM staging_songs
    WHERE artist_id IS NOT NULL
    GROUP BY artist_id";

// %V is the ISO week and %w counts from Sunday = 0, matching Redshift's
// EXTRACT(week) and EXTRACT(dow).
const TIME_SELECT: &str = "
    SELECT DISTINCT start_time,
           CAST(strftime('%H', start_time) AS INTEGER),
           CAST(strftime('%d', start_time) AS INTEGER),
           CAST(strftime('%V', start_time) AS INTEGER),
           CAST(strftime('%m', start_time) AS INTEGER),
           CAST(strftime('%Y', start_time) AS INTEGER),
           CAST(strftime('%w', start_time) AS INTEGER)
    FROM (
        SELECT datetime(ts / 1000, 'unixepoch') AS start_time
        FROM staging_events
        WHERE page = 'NextSong'
    )";

pub(super) fn select_for(target: TargetTable) -> &'static str {
    match target {
        TargetTable::Songplays => SONGPLAYS_SELECT,
        TargetTable::Users => USERS_SELECT,
        TargetTable::Songs => SONGS_SELECT,
        TargetTable::Artists => ARTISTS_SELECT,
        TargetTable::Time => TIME_SELECT,
    }
}
