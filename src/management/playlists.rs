use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::{ProviderError, ServiceError, ValidationError},
    management::ResponseCache,
    spotify::ProviderClient,
    store::{DataStore, Query, Record},
    types::{
        COLLECTION_PLAYLISTS, COLLECTION_WEEKS, ClouderWeek, MESSAGE_ALREADY_IN_TARGET,
        MESSAGE_MOVED, MessageResponse, MoveTrackRequest, SpotifyPlaylist, WeekForPlaylist,
    },
    utils,
};

/// Composes document store reads (with caching) and provider mutations.
///
/// Every operation is one-shot and strictly sequential: one store query or
/// up to three provider calls, awaited in a fixed order.
pub struct PlaylistOrchestrator {
    store: Arc<dyn DataStore>,
    provider: Arc<dyn ProviderClient>,
    cache: Arc<ResponseCache>,
}

impl PlaylistOrchestrator {
    pub fn new(
        store: Arc<dyn DataStore>,
        provider: Arc<dyn ProviderClient>,
        cache: Arc<ResponseCache>,
    ) -> Self {
        Self {
            store,
            provider,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Lists every curated week. Always reads the store.
    pub async fn list_weeks(&self) -> Result<Vec<ClouderWeek>, ServiceError> {
        tracing::info!("listing clouder weeks");
        let records = self.store.query(COLLECTION_WEEKS, &Query::all()).await?;
        Ok(validate_all(COLLECTION_WEEKS, records.into_iter().map(Value::Object))?)
    }

    /// Lists the playlists curated for `week_id`.
    ///
    /// With `use_cache`, a cached result is returned without touching the
    /// store, and a fresh result is cached in its raw form. Cached entries are
    /// re-validated on every hit.
    pub async fn list_playlists_for_week(
        &self,
        week_id: &str,
        use_cache: bool,
    ) -> Result<Vec<SpotifyPlaylist>, ServiceError> {
        let key = utils::playlists_by_week_key(week_id);

        if use_cache {
            if let Some(cached) = self.cache.get(&key).await {
                tracing::debug!(%key, "cache hit");
                return Ok(validate_cached_list(cached)?);
            }
        }

        tracing::info!(week_id, use_cache, "querying playlists for week");
        let records = self
            .store
            .query(COLLECTION_PLAYLISTS, &Query::all().eq("week_id", week_id))
            .await?;
        let raw: Vec<Value> = records.into_iter().map(Value::Object).collect();

        if use_cache {
            self.cache.insert(key, Value::Array(raw.clone())).await;
        }

        Ok(validate_all(COLLECTION_PLAYLISTS, raw)?)
    }

    /// Finds the curated week a playlist belongs to.
    ///
    /// A playlist unknown to the store yields `week_id: None` and is never
    /// cached, so it is picked up as soon as ingestion catches up. When several
    /// records match, the first in store order wins.
    pub async fn get_week_for_playlist(
        &self,
        playlist_id: &str,
        use_cache: bool,
    ) -> Result<WeekForPlaylist, ServiceError> {
        let key = utils::week_by_playlist_key(playlist_id);

        if use_cache {
            if let Some(cached) = self.cache.get(&key).await {
                tracing::debug!(%key, "cache hit");
                return Ok(validate_one(COLLECTION_PLAYLISTS, cached)?);
            }
        }

        tracing::info!(playlist_id, use_cache, "querying week for playlist");
        let records = self
            .store
            .query(
                COLLECTION_PLAYLISTS,
                &Query::all().eq("playlist_id", playlist_id),
            )
            .await?;

        let Some(record) = records.into_iter().next() else {
            tracing::info!(playlist_id, "playlist not found in store");
            return Ok(WeekForPlaylist { week_id: None });
        };

        let response = WeekForPlaylist {
            week_id: Some(project_week_id(&record)?),
        };

        if use_cache {
            let value = serde_json::to_value(&response)
                .map_err(|e| ValidationError::new(COLLECTION_PLAYLISTS, e.to_string()))?;
            self.cache.insert(key, value).await;
        }

        Ok(response)
    }

    /// Moves a track from its source playlist to the target playlist, keeping
    /// a copy in the trash playlist.
    ///
    /// Provider calls run strictly in the order add-target, add-trash,
    /// remove-source. Calls made redundant by aliased playlist ids are skipped:
    /// the trash add when trash is the target, the source removal when source
    /// is the trash. The first failing call aborts the move and nothing already
    /// applied is rolled back; replaying the same request completes it.
    pub async fn move_track(
        &self,
        token: &str,
        request: &MoveTrackRequest,
    ) -> Result<MessageResponse, ProviderError> {
        let MoveTrackRequest {
            track_id,
            source_playlist_id,
            target_playlist_id,
            trash_playlist_id,
        } = request;

        if source_playlist_id == target_playlist_id {
            tracing::info!(%track_id, %target_playlist_id, "track already in target playlist");
            return Ok(MessageResponse::new(MESSAGE_ALREADY_IN_TARGET));
        }

        tracing::info!(
            %track_id,
            %source_playlist_id,
            %target_playlist_id,
            %trash_playlist_id,
            "moving track"
        );

        self.provider
            .add_track(token, track_id, target_playlist_id)
            .await?;

        if trash_playlist_id != target_playlist_id {
            self.provider
                .add_track(token, track_id, trash_playlist_id)
                .await?;
        }

        if source_playlist_id != trash_playlist_id {
            self.provider
                .remove_track(token, track_id, source_playlist_id)
                .await?;
        }

        Ok(MessageResponse::new(MESSAGE_MOVED))
    }
}

fn validate_one<T: DeserializeOwned>(collection: &str, value: Value) -> Result<T, ValidationError> {
    serde_json::from_value(value).map_err(|e| ValidationError::new(collection, e.to_string()))
}

// One malformed record fails the whole list.
fn validate_all<T, I>(collection: &str, values: I) -> Result<Vec<T>, ValidationError>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = Value>,
{
    values
        .into_iter()
        .map(|value| validate_one(collection, value))
        .collect()
}

fn validate_cached_list(cached: Value) -> Result<Vec<SpotifyPlaylist>, ValidationError> {
    match cached {
        Value::Array(items) => validate_all(COLLECTION_PLAYLISTS, items),
        _ => Err(ValidationError::new(
            COLLECTION_PLAYLISTS,
            "cached entry is not a list",
        )),
    }
}

fn project_week_id(record: &Record) -> Result<String, ValidationError> {
    match record.get("week_id") {
        Some(Value::String(week_id)) => Ok(week_id.clone()),
        Some(_) => Err(ValidationError::new(
            COLLECTION_PLAYLISTS,
            "field `week_id` is not a string",
        )),
        None => Err(ValidationError::new(
            COLLECTION_PLAYLISTS,
            "missing field `week_id`",
        )),
    }
}
