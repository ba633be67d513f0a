//! Clouder API Library
//!
//! This library provides the backend-for-frontend of the Clouder web client. It
//! authenticates users against Spotify via the OAuth2 authorization-code flow,
//! serves curated week and playlist metadata from a document store, and moves
//! tracks between playlists through the Spotify Web API.
//!
//! # Modules
//!
//! - `api` - HTTP handlers and the error type they answer with
//! - `cli` - Command implementations of the `clouder` binary
//! - `config` - Configuration management and environment variables
//! - `error` - Error types of the provider, store and orchestrator layers
//! - `management` - Response cache and the playlist orchestrator
//! - `server` - Router construction and the HTTP server
//! - `spotify` - Spotify Web API and OAuth clients
//! - `store` - Read-only document store
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```no_run
//! use clouder::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> clouder::Res<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     server::start_api_server(settings).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod store;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used where errors of different layers meet, mostly during startup. Library
/// operations return their own typed errors instead.
///
/// # Example
///
/// ```
/// use clouder::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a console status line with a blue `o` marker.
///
/// Console output is reserved for the operator-facing CLI commands; the
/// library itself logs through `tracing`.
///
/// # Example
///
/// ```ignore
/// info!("Starting Clouder API on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a console line with a green checkmark.
///
/// ```ignore
/// success!("Found {} clouder weeks", weeks.len());
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red error line to stderr and exits with status 1.
///
/// The macro diverges, so it can stand in for a value in a `match` arm:
///
/// ```ignore
/// let state = match AppState::from_settings(settings) {
///     Ok(state) => state,
///     Err(e) => error!("Failed to initialize. Err: {}", e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a console line with a yellow `!` marker for recoverable problems.
///
/// ```ignore
/// warning!("No playlists found for week {}.", week_id);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
