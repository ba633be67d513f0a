//! # API Module
//!
//! This module provides the HTTP endpoints the Clouder web client talks to.
//! Handlers are thin: they validate the request shape, delegate to the
//! [`crate::spotify::auth::AuthProvider`] or the
//! [`crate::management::PlaylistOrchestrator`], and map failures through
//! [`ApiError`].
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - `GET /login`, redirects to the Spotify authorization page
//! - [`callback`] - `GET /callback`, exchanges the authorization code and
//!   redirects to the frontend with the token fields in the query string
//! - [`refresh_token`] - `POST /refresh_token`, refreshes an access token
//!
//! ### Curated Playlists
//!
//! - [`list_weeks`] - `GET /clouder_weeks`
//! - [`week_playlists`] - `GET /clouder_weeks/{week_id}/sp_playlists?cache=`
//! - [`playlist_week`] - `GET /clouder_playlists/{playlist_id}/clouder_week?cache=`
//! - [`move_track`] - `POST /clouder_playlists/move_track?sp_token=`
//! - [`clear_cache`] - `DELETE /cache`
//!
//! ### Monitoring
//!
//! - [`root`] - `GET /`, welcome message
//! - [`health`] - `GET /health`, status and version
//!
//! ## Errors
//!
//! Every failure is answered with a JSON body `{"detail": ...}`. Missing
//! required input is a 400; provider failures keep the upstream status and
//! body.

mod auth;
mod error;
mod health;
mod playlists;

pub use auth::{callback, login, refresh_token};
pub use error::ApiError;
pub use health::{health, root};
pub use playlists::{clear_cache, list_weeks, move_track, playlist_week, week_playlists};
