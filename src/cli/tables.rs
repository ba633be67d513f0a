use std::sync::Arc;

use tabled::Table;

use crate::{
    config::Settings,
    error,
    management::{PlaylistOrchestrator, ResponseCache},
    spotify::SpotifyClient,
    store::JsonStore,
    success, utils, warning,
};

pub async fn weeks(settings: Settings) {
    let service = orchestrator(&settings);

    match service.list_weeks().await {
        Ok(weeks) if weeks.is_empty() => warning!("No clouder weeks found."),
        Ok(weeks) => {
            success!("Found {} clouder weeks", weeks.len());
            println!("{}", Table::new(utils::week_table_rows(&weeks)));
        }
        Err(e) => error!("Failed to load clouder weeks. Err: {}", e),
    }
}

pub async fn playlists(settings: Settings, week_id: String) {
    let service = orchestrator(&settings);

    match service
        .list_playlists_for_week(&week_id, false)
        .await
    {
        Ok(playlists) if playlists.is_empty() => {
            warning!("No playlists found for week {}.", week_id)
        }
        Ok(playlists) => {
            success!("Found {} playlists for week {}", playlists.len(), week_id);
            println!("{}", Table::new(utils::playlist_table_rows(&playlists)));
        }
        Err(e) => error!("Failed to load playlists for week {}. Err: {}", week_id, e),
    }
}

// Reads go straight to the store; the provider client is never called.
fn orchestrator(settings: &Settings) -> PlaylistOrchestrator {
    let provider = match SpotifyClient::from_settings(settings) {
        Ok(provider) => provider,
        Err(e) => error!("Failed to initialize. Err: {}", e),
    };

    PlaylistOrchestrator::new(
        Arc::new(JsonStore::new(&settings.data_dir)),
        Arc::new(provider),
        Arc::new(ResponseCache::new()),
    )
}
