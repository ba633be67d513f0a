//! # Spotify Integration Module
//!
//! This module is the integration layer between Clouder and the Spotify Web API.
//! It covers the two external concerns of the service:
//!
//! - [`auth`] - OAuth 2.0 authorization-code flow: building the authorization URL,
//!   exchanging codes for tokens and refreshing tokens.
//! - [`SpotifyClient`] - authenticated playlist mutations (add and remove a track).
//!
//! ## Architecture
//!
//! ```text
//! HTTP handlers (api)
//!          ↓
//! PlaylistOrchestrator (management)
//!          ↓
//! ProviderClient trait ── SpotifyClient (reqwest)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Error Handling
//!
//! Every non-2xx response becomes a [`ProviderError`] carrying the upstream
//! status and body (structured when the provider answered with JSON). Transport
//! failures are logged and collapsed into [`ProviderError::internal`] so no
//! connection detail ever reaches a client.
//!
//! Connect failures may be retried a configurable number of times, since the
//! request never left the process. Timeouts are not retried: the provider may
//! already have applied the mutation, and adding a track twice appends a
//! duplicate. HTTP status failures are never retried.
//!
//! ## Connection Reuse
//!
//! A single `reqwest::Client` is built at startup and shared by all requests,
//! so connections to the provider are pooled for the lifetime of the process.

pub mod auth;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, header::CONTENT_TYPE};
use serde::Serialize;

use crate::{
    Res,
    config::Settings,
    error::{ProviderError, ProviderErrorBody},
    types::{AddTrackToPlaylistRequest, RemoveTracksFromPlaylistRequest, TrackUri},
    utils,
};

/// Mutations against the provider's playlist-tracks endpoint.
///
/// The bearer token is passed through untouched; it is never validated
/// locally.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn add_track(
        &self,
        token: &str,
        track_id: &str,
        playlist_id: &str,
    ) -> Result<(), ProviderError>;

    async fn remove_track(
        &self,
        token: &str,
        track_id: &str,
        playlist_id: &str,
    ) -> Result<(), ProviderError>;
}

/// [`ProviderClient`] for the Spotify Web API.
pub struct SpotifyClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl SpotifyClient {
    /// Creates a client for `base_url` whose requests time out after `timeout`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use clouder::spotify::SpotifyClient;
    ///
    /// fn main() -> clouder::Res<()> {
    ///     let client = SpotifyClient::new("https://api.spotify.com/v1", Duration::from_secs(10))?
    ///         .with_retries(2, Duration::from_millis(500));
    ///     # drop(client);
    ///     Ok(())
    /// }
    /// ```
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Res<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Wraps an already configured HTTP client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_retries: 0,
            retry_delay: Duration::ZERO,
        }
    }

    pub fn from_settings(settings: &Settings) -> Res<Self> {
        Ok(Self::new(&settings.spotify_base_url, settings.provider_timeout)?
            .with_retries(settings.provider_max_retries, settings.provider_retry_delay))
    }

    /// Retries connect failures up to `max_retries` times, waiting `delay`
    /// between attempts.
    pub fn with_retries(mut self, max_retries: u32, delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = delay;
        self
    }

    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<(), ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0;

        loop {
            let result = self
                .client
                .request(method.clone(), &url)
                .bearer_auth(token)
                .json(body)
                .send()
                .await;

            match result {
                Ok(response) => return into_result(response).await,
                Err(err) if err.is_connect() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(%method, path, attempt, error = %err, "retrying provider request");
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(err) => {
                    tracing::error!(%method, path, error = %err, "provider request failed");
                    return Err(ProviderError::internal());
                }
            }
        }
    }
}

#[async_trait]
impl ProviderClient for SpotifyClient {
    async fn add_track(
        &self,
        token: &str,
        track_id: &str,
        playlist_id: &str,
    ) -> Result<(), ProviderError> {
        let body = AddTrackToPlaylistRequest {
            uris: vec![utils::track_uri(track_id)],
        };
        self.send(
            Method::POST,
            &format!("/playlists/{playlist_id}/tracks"),
            token,
            &body,
        )
        .await
    }

    async fn remove_track(
        &self,
        token: &str,
        track_id: &str,
        playlist_id: &str,
    ) -> Result<(), ProviderError> {
        let body = RemoveTracksFromPlaylistRequest {
            tracks: vec![TrackUri {
                uri: utils::track_uri(track_id),
            }],
        };
        self.send(
            Method::DELETE,
            &format!("/playlists/{playlist_id}/tracks"),
            token,
            &body,
        )
        .await
    }
}

/// Maps a provider response onto `()` or a [`ProviderError`].
///
/// Success bodies (including empty ones) are discarded.
async fn into_result(response: Response) -> Result<(), ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    let text = match response.text().await {
        Ok(text) => text,
        Err(err) => {
            tracing::error!(status = status.as_u16(), error = %err, "failed to read provider error body");
            return Err(ProviderError::internal());
        }
    };
    tracing::warn!(status = status.as_u16(), body = %text, "provider rejected request");

    let body = if is_json {
        serde_json::from_str(&text)
            .map(ProviderErrorBody::Json)
            .unwrap_or(ProviderErrorBody::Text(text))
    } else {
        ProviderErrorBody::Text(text)
    };

    Err(ProviderError::new(status.as_u16(), body))
}
