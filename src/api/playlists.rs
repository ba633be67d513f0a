use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde_json::{Value, json};

use crate::{
    api::ApiError,
    server::AppState,
    types::{
        CacheParams, ClouderWeek, MessageResponse, MoveTrackParams, MoveTrackRequest,
        SpotifyPlaylist, WeekForPlaylist,
    },
};

pub async fn list_weeks(State(state): State<AppState>) -> Result<Json<Vec<ClouderWeek>>, ApiError> {
    Ok(Json(state.playlists.list_weeks().await?))
}

pub async fn week_playlists(
    State(state): State<AppState>,
    Path(week_id): Path<String>,
    params: Result<Query<CacheParams>, QueryRejection>,
) -> Result<Json<Vec<SpotifyPlaylist>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let playlists = state
        .playlists
        .list_playlists_for_week(&week_id, params.use_cache())
        .await?;
    Ok(Json(playlists))
}

pub async fn playlist_week(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    params: Result<Query<CacheParams>, QueryRejection>,
) -> Result<Json<WeekForPlaylist>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let week = state
        .playlists
        .get_week_for_playlist(&playlist_id, params.use_cache())
        .await?;
    Ok(Json(week))
}

pub async fn move_track(
    State(state): State<AppState>,
    params: Result<Query<MoveTrackParams>, QueryRejection>,
    body: Result<Json<MoveTrackRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let Some(token) = params.sp_token.filter(|t| !t.is_empty()) else {
        return Err(ApiError::bad_request("No sp_token provided"));
    };
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    Ok(Json(state.playlists.move_track(&token, &request).await?))
}

/// Drops every cached response.
pub async fn clear_cache(State(state): State<AppState>) -> Json<Value> {
    let cleared = state.playlists.cache().clear().await;
    tracing::info!(cleared, "response cache cleared");
    Json(json!({ "cleared": cleared }))
}
