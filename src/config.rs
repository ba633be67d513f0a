//! Configuration management for the Clouder API.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Settings are read once at startup into a
//! [`Settings`] value which is then shared with every component that needs it.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:80/api/callback";
pub const DEFAULT_BASE_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SCOPE: &str = "user-read-private user-read-email user-read-playback-state user-modify-playback-state playlist-modify-public playlist-modify-private";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:80";
pub const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PROVIDER_MAX_RETRIES: u32 = 0;
pub const DEFAULT_PROVIDER_RETRY_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings of the service.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_redirect_uri: String,
    pub spotify_base_url: String,
    pub spotify_auth_url: String,
    pub spotify_token_url: String,
    pub spotify_scope: String,
    pub frontend_url: String,
    pub cors_allowed_origins: Vec<String>,
    pub server_address: String,
    pub data_dir: PathBuf,
    pub provider_timeout: Duration,
    pub provider_max_retries: u32,
    pub provider_retry_delay: Duration,
    pub log_format: LogFormat,
}

/// Output format of the server logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Settings {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the settings for commands that only read the document store.
    pub fn read_only_from_env() -> Result<Self, ConfigError> {
        Self::read_only_from_lookup(|key| env::var(key).ok())
    }

    /// Builds the settings from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Missing`] when `SPOTIFY_CLIENT_ID` or
    ///   `SPOTIFY_CLIENT_SECRET` is absent
    /// - [`ConfigError::Invalid`] when a numeric setting or `LOG_FORMAT` does
    ///   not parse
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::build(lookup, true)
    }

    /// Like [`Settings::from_lookup`], but Spotify credentials may be absent
    /// and are left empty.
    pub fn read_only_from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::build(lookup, false)
    }

    fn build<F>(lookup: F, require_credentials: bool) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let credential = |key: &'static str| match get(key) {
            Some(value) => Ok(value),
            None if require_credentials => Err(ConfigError::Missing(key)),
            None => Ok(String::new()),
        };
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let data_dir = match get("CLOUDER_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir(),
        };

        Ok(Self {
            spotify_client_id: credential("SPOTIFY_CLIENT_ID")?,
            spotify_client_secret: credential("SPOTIFY_CLIENT_SECRET")?,
            spotify_redirect_uri: or_default("SPOTIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            spotify_base_url: or_default("SPOTIFY_BASE_URL", DEFAULT_BASE_URL),
            spotify_auth_url: or_default("SPOTIFY_AUTH_URL", DEFAULT_AUTH_URL),
            spotify_token_url: or_default("SPOTIFY_TOKEN_URL", DEFAULT_TOKEN_URL),
            spotify_scope: or_default("SPOTIFY_SCOPE", DEFAULT_SCOPE),
            frontend_url: or_default("FRONTEND_URL", DEFAULT_FRONTEND_URL),
            cors_allowed_origins: split_origins(&or_default(
                "CORS_ALLOWED_ORIGINS",
                DEFAULT_CORS_ALLOWED_ORIGINS,
            )),
            server_address: or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            data_dir,
            provider_timeout: Duration::from_secs(parse_number(
                "PROVIDER_TIMEOUT_SECS",
                get("PROVIDER_TIMEOUT_SECS"),
                DEFAULT_PROVIDER_TIMEOUT_SECS,
            )?),
            provider_max_retries: parse_number(
                "PROVIDER_MAX_RETRIES",
                get("PROVIDER_MAX_RETRIES"),
                DEFAULT_PROVIDER_MAX_RETRIES,
            )?,
            provider_retry_delay: Duration::from_millis(parse_number(
                "PROVIDER_RETRY_DELAY_MS",
                get("PROVIDER_RETRY_DELAY_MS"),
                DEFAULT_PROVIDER_RETRY_DELAY_MS,
            )?),
            log_format: parse_log_format(get("LOG_FORMAT"))?,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}

fn parse_log_format(value: Option<String>) -> Result<LogFormat, ConfigError> {
    match value {
        None => Ok(LogFormat::default()),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::Invalid {
                name: "LOG_FORMAT",
                value: raw,
            }),
        },
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

/// Returns the platform-specific directory for application files.
///
/// - Linux: `~/.local/share/clouder`
/// - macOS: `~/Library/Application Support/clouder`
/// - Windows: `%LOCALAPPDATA%/clouder`
pub fn app_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("clouder");
    path
}

fn default_data_dir() -> PathBuf {
    app_dir().join("data")
}

/// Loads environment variables from `.env` files.
///
/// The working directory is consulted first, then `clouder/.env` in the local
/// data directory. Variables already present in the environment are never
/// overwritten, and a missing file is not an error.
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or an
/// existing `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = app_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.to_string()),
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}
