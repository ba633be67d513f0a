use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post},
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    Res, api,
    config::Settings,
    management::{PlaylistOrchestrator, ResponseCache},
    spotify::{
        SpotifyClient,
        auth::{AuthProvider, SpotifyAuth},
    },
    store::JsonStore,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub auth: Arc<dyn AuthProvider>,
    pub playlists: Arc<PlaylistOrchestrator>,
}

impl AppState {
    /// Wires the production components: JSON document store, pooled Spotify
    /// client and a fresh response cache.
    pub fn from_settings(settings: Settings) -> Res<Self> {
        let store = Arc::new(JsonStore::new(&settings.data_dir));
        let provider = Arc::new(SpotifyClient::from_settings(&settings)?);
        let auth = Arc::new(SpotifyAuth::from_settings(&settings)?);
        let cache = Arc::new(ResponseCache::new());

        Ok(Self {
            settings: Arc::new(settings),
            auth,
            playlists: Arc::new(PlaylistOrchestrator::new(store, provider, cache)),
        })
    }
}

/// Builds the router with every route, CORS and request tracing.
///
/// `/health` is left out of request tracing so probes do not flood the logs.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.cors_allowed_origins);

    Router::new()
        .route("/", get(api::root))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/refresh_token", post(api::refresh_token))
        .route("/clouder_weeks", get(api::list_weeks))
        .route(
            "/clouder_weeks/{week_id}/sp_playlists",
            get(api::week_playlists),
        )
        .route(
            "/clouder_playlists/{playlist_id}/clouder_week",
            get(api::playlist_week),
        )
        .route("/clouder_playlists/move_track", post(api::move_track))
        .route("/cache", delete(api::clear_cache))
        .layer(TraceLayer::new_for_http())
        .route("/health", get(api::health))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Binds `settings.server_address` and serves the API until the process is
/// stopped.
pub async fn start_api_server(settings: Settings) -> Res<()> {
    let addr = SocketAddr::from_str(&settings.server_address)?;
    tracing::info!(data_dir = %settings.data_dir.display(), "using document store");

    let app = build_router(AppState::from_settings(settings)?);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, "clouder api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
