use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};
use tabled::Tabled;

pub const COLLECTION_WEEKS: &str = "clouder_weeks";
pub const COLLECTION_PLAYLISTS: &str = "sp_playlists";

pub const MESSAGE_ALREADY_IN_TARGET: &str = "Track already in target playlist";
pub const MESSAGE_MOVED: &str = "Track moved successfully";

/// A curated, time-boxed grouping of playlists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClouderWeek {
    pub week_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A provider playlist enriched with curation metadata.
///
/// Fields the service does not know about are kept in `extra` and passed
/// through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotifyPlaylist {
    pub playlist_id: String,
    pub playlist_name: String,
    pub week_id: String,
    pub curated_name: String,
    pub curated_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekForPlaylist {
    #[serde(rename = "clouder_week")]
    pub week_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveTrackRequest {
    pub track_id: String,
    pub source_playlist_id: String,
    pub target_playlist_id: String,
    pub trash_playlist_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenRefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheParams {
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub cache: Option<bool>,
}

impl CacheParams {
    pub fn use_cache(&self) -> bool {
        self.cache.unwrap_or(true)
    }
}

/// Accepts the usual spellings of a query string flag: `true`/`false`,
/// `1`/`0`, `yes`/`no`, `on`/`off`, `t`/`f`, `y`/`n`, in any case.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Ok(Some(true)),
        "false" | "0" | "no" | "off" | "f" | "n" => Ok(Some(false)),
        _ => Err(de::Error::custom(format!("`{raw}` is not a valid boolean"))),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoveTrackParams {
    pub sp_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTracksFromPlaylistRequest {
    pub tracks: Vec<TrackUri>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackUri {
    pub uri: String,
}

#[derive(Tabled)]
pub struct WeekTableRow {
    pub week: String,
    pub start: String,
    pub end: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub curated: String,
    pub kind: String,
    pub id: String,
}
