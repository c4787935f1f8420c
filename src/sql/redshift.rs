use super::TargetTable;

pub(super) const CREATE_TABLES: [(&str, &str); 7] = [
    (
        super::STAGING_EVENTS,
        "CREATE TABLE IF NOT EXISTS staging_events (
            artist          TEXT,
            auth            TEXT,
            firstName       TEXT,
            gender          TEXT,
            itemInSession   INT,
            lastName        TEXT,
            length          TEXT,
            level           TEXT,
            location        TEXT,
            method          TEXT,
            page            TEXT,
            registration    TEXT,
            sessionId       INT,
            song            TEXT,
            status          INT,
            ts              BIGINT,
            userAgent       TEXT,
            userId          INT
        );",
    ),
    (
        super::STAGING_SONGS,
        "CREATE TABLE IF NOT EXISTS staging_songs (
            num_songs          INT,
            artist_id          TEXT,
            artist_latitude    TEXT,
            artist_longitude   TEXT,
            artist_location    TEXT,
            artist_name        TEXT,
            song_id            TEXT,
            title              TEXT,
            duration           TEXT,
            year               INT
        );",
    ),
    (
        super::DIM_USERS,
        "CREATE TABLE IF NOT EXISTS dim_users (
            user_id      INT    NOT NULL   PRIMARY KEY,
            first_name   TEXT   NOT NULL,
            last_name    TEXT   NOT NULL,
            gender       TEXT,
            level        TEXT   NOT NULL
        );",
    ),
    (
        super::DIM_ARTISTS,
        "CREATE TABLE IF NOT EXISTS dim_artists (
            artist_id   TEXT    NOT NULL   PRIMARY KEY,
            name        TEXT    NOT NULL,
            location    TEXT,
            latitude    FLOAT,
            longitude   FLOAT
        );",
    ),
    (
        super::DIM_SONGS,
        "CREATE TABLE IF NOT EXISTS dim_songs (
            song_id     TEXT    NOT NULL   PRIMARY KEY   DISTKEY,
            title       TEXT    NOT NULL,
            artist_id   TEXT    NOT NULL,
            year        INT,
            duration    FLOAT,
            FOREIGN KEY(artist_id) REFERENCES dim_artists(artist_id)
        );",
    ),
    (
        super::DIM_TIME,
        "CREATE TABLE IF NOT EXISTS dim_time (
            start_time   TIMESTAMP   NOT NULL   PRIMARY KEY   SORTKEY,
            hour         INT         NOT NULL,
            day          INT         NOT NULL,
            week         INT         NOT NULL,
            month        INT         NOT NULL,
            year         INT         NOT NULL,
            weekday      INT         NOT NULL
        );",
    ),
    (
        super::FACT_SONGPLAYS,
        "CREATE TABLE IF NOT EXISTS fact_songplays (
            songplay_id   INT         IDENTITY(0,1)   PRIMARY KEY,
            start_time    TIMESTAMP   NOT NULL        SORTKEY,
            user_id       INT         NOT NULL,
            level         TEXT        NOT NULL,
            song_id       TEXT                        DISTKEY,
            artist_id     TEXT,
            session_id    INT,
            location      TEXT,
            user_agent    TEXT,
            FOREIGN KEY(start_time)   REFERENCES dim_time(start_time),
            FOREIGN KEY(user_id)      REFERENCES dim_users(user_id),
            FOREIGN KEY(song_id)      REFERENCES dim_songs(song_id),
            FOREIGN KEY(artist_id)    REFERENCES dim_artists(artist_id)
        );",
    ),
];

const SONGPLAYS_SELECT: &str = "
    SELECT TIMESTAMP 'epoch' + e.ts / 1000 * INTERVAL '1 second',
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

const USERS_SELECT: &str = "
    SELECT DISTINCT userId, firstName, lastName, gender, level
    FROM staging_events
    WHERE page = 'NextSong'";

const SONGS_SELECT: &str = "
    SELECT DISTINCT song_id, title, artist_id, year, CONVERT(FLOAT, duration)
    FROM staging_songs";

const ARTISTS_SELECT: &str = "
    SELECT DISTINCT artist_id,
           artist_name,
           artist_location,
           CONVERT(FLOAT, artist_latitude),
           CONVERT(FLOAT, artist_longitude)
    FROM staging_songs";

const TIME_SELECT: &str = "
    SELECT DISTINCT TIMESTAMP 'epoch' + e.ts / 1000 * INTERVAL '1 second' AS dt,
           EXTRACT(hour FROM dt),
           EXTRACT(day FROM dt),
           EXTRACT(week FROM dt),
           EXTRACT(month FROM dt),
           EXTRACT(year FROM dt),
           EXTRACT(dow FROM dt)
    FROM staging_events AS e
    WHERE e.page = 'NextSong'";

pub(super) fn select_for(target: TargetTable) -> &'static str {
    match target {
        TargetTable::Songplays => SONGPLAYS_SELECT,
        TargetTable::Users => USERS_SELECT,
        TargetTable::Songs => SONGS_SELECT,
        TargetTable::Artists => ARTISTS_SELECT,
        TargetTable::Time => TIME_SELECT,
    }
}
