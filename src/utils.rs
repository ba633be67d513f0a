use url::form_urlencoded;

use crate::types::{ClouderWeek, PlaylistTableRow, SpotifyPlaylist, TokenResponse, WeekTableRow};

pub const CACHE_PREFIX_PLAYLISTS_BY_WEEK: &str = "playlists_by_week";
pub const CACHE_PREFIX_WEEK_BY_PLAYLIST: &str = "week_by_playlist";

pub fn playlists_by_week_key(week_id: &str) -> String {
    format!("{CACHE_PREFIX_PLAYLISTS_BY_WEEK}:{week_id}")
}

pub fn week_by_playlist_key(playlist_id: &str) -> String {
    format!("{CACHE_PREFIX_WEEK_BY_PLAYLIST}:{playlist_id}")
}

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{track_id}")
}

/// Builds the frontend URL the OAuth callback redirects to.
///
/// Only the token fields are forwarded; an absent refresh token is omitted.
pub fn frontend_callback_url(frontend_url: &str, token: &TokenResponse) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("access_token", &token.access_token)
        .append_pair("token_type", &token.token_type)
        .append_pair("scope", &token.scope)
        .append_pair("expires_in", &token.expires_in.to_string());
    if let Some(refresh_token) = &token.refresh_token {
        query.append_pair("refresh_token", refresh_token);
    }

    format!(
        "{frontend}/spotify-callback?{query}",
        frontend = frontend_url.trim_end_matches('/'),
        query = query.finish()
    )
}

pub fn week_table_rows(weeks: &[ClouderWeek]) -> Vec<WeekTableRow> {
    let mut weeks = weeks.to_vec();
    weeks.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    weeks
        .into_iter()
        .map(|w| WeekTableRow {
            week: w.week_id,
            start: w.start_date.format("%Y-%m-%d").to_string(),
            end: w.end_date.format("%Y-%m-%d").to_string(),
        })
        .collect()
}

pub fn playlist_table_rows(playlists: &[SpotifyPlaylist]) -> Vec<PlaylistTableRow> {
    playlists
        .iter()
        .map(|p| PlaylistTableRow {
            name: p.playlist_name.clone(),
            curated: p.curated_name.clone(),
            kind: p.curated_type.clone(),
            id: p.playlist_id.clone(),
        })
        .collect()
}
