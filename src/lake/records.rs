use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One entry of the song dataset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SongRecord {
    pub num_songs: Option<i64>,
    pub artist_id: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
    pub artist_location: Option<String>,
    pub artist_name: Option<String>,
    pub song_id: Option<String>,
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub year: Option<i64>,
}

/// One entry of the user activity log.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub artist: Option<String>,
    pub auth: Option<String>,
    pub first_name: Option<String>,
    pub gender: Option<String>,
    pub item_in_session: Option<i64>,
    pub last_name: Option<String>,
    pub length: Option<f64>,
    pub level: Option<String>,
    pub location: Option<String>,
    pub method: Option<String>,
    pub page: Option<String>,
    pub registration: Option<f64>,
    pub session_id: Option<i64>,
    pub song: Option<String>,
    pub status: Option<i64>,
    pub ts: Option<i64>,
    pub user_agent: Option<String>,
    #[serde(default, deserialize_with = "lenient_user_id")]
    pub user_id: Option<String>,
}

impl LogRecord {
    pub fn is_song_play(&self) -> bool {
        self.page.as_deref() == Some("NextSong")
    }
}

/// Logged-out events carry an empty string, others a string or a number.
fn lenient_user_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
