//! Records written by the test dataset and the counts they produce.
#![allow(dead_code)]

pub const SONG_INTRO_ID: &str = "SOUPIRU12A6D4FA1E1";
pub const SONG_INTRO_TITLE: &str = "Der Kleine Dompfaff";
pub const ARTIST_INTRO_ID: &str = "ARJIE2Y1187B994AB7";
pub const ARTIST_INTRO_NAME: &str = "Line Renaud";

pub const SONG_OUTRO_ID: &str = "SOZCTXZ12AB0182364";
pub const SONG_OUTRO_TITLE: &str = "Setanta matins";
pub const ARTIST_OUTRO_ID: &str = "AR5KOSW1187FB35FF4";
pub const ARTIST_OUTRO_NAME: &str = "Elena";

/// The intro song appears in two files with identical content.
pub const SONG_FILES: [(&str, &str); 3] = [
    (
        "A/A/A/TRAAAAW128F429D538.json",
        r#"{"num_songs": 1, "artist_id": "ARJIE2Y1187B994AB7", "artist_latitude": null, "artist_longitude": null, "artist_location": "", "artist_name": "Line Renaud", "song_id": "SOUPIRU12A6D4FA1E1", "title": "Der Kleine Dompfaff", "duration": 152.92036, "year": 2004}"#,
    ),
    (
        "A/A/B/TRAABJL12903CDCF1A.json",
        r#"{"num_songs": 1, "artist_id": "ARJIE2Y1187B994AB7", "artist_latitude": null, "artist_longitude": null, "artist_location": "", "artist_name": "Line Renaud", "song_id": "SOUPIRU12A6D4FA1E1", "title": "Der Kleine Dompfaff", "duration": 152.92036, "year": 2004}"#,
    ),
    (
        "A/B/C/TRABCEI128F424C983.json",
        r#"{"num_songs": 1, "artist_id": "AR5KOSW1187FB35FF4", "artist_latitude": 49.80388, "artist_longitude": 15.47491, "artist_location": "Dubai UAE", "artist_name": "Elena", "song_id": "SOZCTXZ12AB0182364", "title": "Setanta matins", "duration": 269.58322, "year": 0}"#,
    ),
];

/// 2018-11-21T08:16:47Z
pub const TS_LILY_PAID: i64 = 1542788207796;
/// 2018-11-21T08:18:20Z
pub const TS_KAYLEE: i64 = 1542788300000;
/// 2018-11-20T07:46:40Z
pub const TS_LILY_FREE: i64 = 1542700000000;

pub const EVENTS_FILE: &str = "2018/11/2018-11-21-events.json";

pub fn events_ndjson() -> String {
    [
        format!(
            r#"{{"artist": "Line Renaud", "auth": "Logged In", "firstName": "Lily", "gender": "F", "itemInSession": 3, "lastName": "Koch", "length": 152.92036, "level": "paid", "location": "Chicago-Naperville-Elgin, IL-IN-WI", "method": "PUT", "page": "NextSong", "registration": 1541048010796.0, "sessionId": 818, "song": "Der Kleine Dompfaff", "status": 200, "ts": {}, "userAgent": "Mozilla/5.0", "userId": "15"}}"#,
            TS_LILY_PAID
        ),
        format!(
            r#"{{"artist": "Nobody Known", "auth": "Logged In", "firstName": "Kaylee", "gender": "F", "itemInSession": 0, "lastName": "Summers", "length": 200.0, "level": "free", "location": "Phoenix-Mesa-Scottsdale, AZ", "method": "PUT", "page": "NextSong", "registration": 1540344794796.0, "sessionId": 139, "song": "Unmatched Song", "status": 200, "ts": {}, "userAgent": "Mozilla/5.0", "userId": "8"}}"#,
            TS_KAYLEE
        ),
        r#"{"artist": null, "auth": "Logged Out", "firstName": null, "gender": null, "itemInSession": 0, "lastName": null, "length": null, "level": "free", "location": null, "method": "GET", "page": "Home", "registration": null, "sessionId": 52, "song": null, "status": 200, "ts": 1542788400000, "userAgent": null, "userId": ""}"#.to_string(),
        format!(
            r#"{{"artist": "Elena", "auth": "Logged In", "firstName": "Lily", "gender": "F", "itemInSession": 1, "lastName": "Koch", "length": 269.58322, "level": "free", "location": "Chicago-Naperville-Elgin, IL-IN-WI", "method": "PUT", "page": "NextSong", "registration": 1541048010796.0, "sessionId": 700, "song": "Setanta matins", "status": 200, "ts": {}, "userAgent": "Mozilla/5.0", "userId": 15}}"#,
            TS_LILY_FREE
        ),
    ]
    .join("\n")
}

pub const JSONPATHS: &str = r#"{
    "jsonpaths": [
        "$['artist']",
        "$['auth']",
        "$['firstName']",
        "$['gender']",
        "$['itemInSession']",
        "$['lastName']",
        "$['length']",
        "$['level']",
        "$['location']",
        "$['method']",
        "$['page']",
        "$['registration']",
        "$['sessionId']",
        "$['song']",
        "$['status']",
        "$['ts']",
        "$['userAgent']",
        "$['userId']"
    ]
}"#;

pub const STAGED_EVENTS: i64 = 4;
pub const STAGED_SONGS: i64 = 3;
/// Warehouse fact rows: the intro play repeats once per staged copy of the
/// intro song, and the unmatched play keeps null ids.
pub const WAREHOUSE_SONGPLAYS: i64 = 4;
/// Kaylee's play matches no staged song.
pub const UNMATCHED_USER_ID: i64 = 8;
pub const SONG_PLAYS: i64 = 3;
pub const DISTINCT_SONGS: i64 = 2;
pub const DISTINCT_ARTISTS: i64 = 2;
pub const DISTINCT_USER_IDS: i64 = 2;
pub const DISTINCT_PLAY_SECONDS: i64 = 3;
