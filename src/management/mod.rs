mod cache;
mod playlists;

pub use cache::ResponseCache;
pub use playlists::PlaylistOrchestrator;
