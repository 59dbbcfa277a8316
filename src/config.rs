//! Configuration management for the MP3 sync CLI.
//!
//! This module handles loading and accessing configuration values from command
//! line flags, environment variables and `.env` files. Credentials resolve in
//! that override order: an explicit flag wins over a process environment
//! variable, which wins over a value loaded from the `.env` file.
//!
//! The resolved values are captured once at startup in an immutable [`Config`]
//! that is passed by reference to every component needing catalog credentials;
//! core logic never reads the ambient process environment.

use dotenv;
use std::{env, path::PathBuf};

/// Spotify Web API defaults; overridable through the environment for tests.
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Immutable runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Maximum worker count for parallel phases; 0 means "system-chosen".
    pub workers: usize,
    pub api_url: String,
    pub token_url: String,
}

impl Config {
    /// Resolves the configuration from explicit flag values and the
    /// environment. Flags take precedence; `load_env` must already have run
    /// so `.env` values are visible as environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing credential. A missing
    /// credential is a fatal precondition failure for every flow.
    pub fn resolve(
        client_id: Option<String>,
        client_secret: Option<String>,
        redirect_uri: Option<String>,
        workers: Option<usize>,
    ) -> Result<Self, String> {
        let client_id = client_id
            .or_else(|| env::var("SPOTIFY_CLIENT_ID").ok())
            .ok_or("SPOTIFY_CLIENT_ID is not set (flag --client-id or environment)")?;
        let client_secret = client_secret
            .or_else(|| env::var("SPOTIFY_CLIENT_SECRET").ok())
            .ok_or("SPOTIFY_CLIENT_SECRET is not set (flag --client-secret or environment)")?;
        let redirect_uri = redirect_uri
            .or_else(|| env::var("SPOTIFY_REDIRECT_URI").ok())
            .ok_or("SPOTIFY_REDIRECT_URI is not set (flag --redirect-uri or environment)")?;

        Ok(Config {
            client_id,
            client_secret,
            redirect_uri,
            workers: workers.unwrap_or(0),
            api_url: env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            token_url: env::var("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string()),
        })
    }
}

/// Loads environment variables from a `.env` file.
///
/// Without an explicit path the file is looked up in the platform-specific
/// local data directory under `mp3ify/.env`, creating the parent directory if
/// needed:
/// - Linux: `~/.local/share/mp3ify/.env`
/// - macOS: `~/Library/Application Support/mp3ify/.env`
/// - Windows: `%LOCALAPPDATA%/mp3ify/.env`
///
/// A missing file is not an error; credentials may come entirely from flags
/// or the process environment.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created.
pub async fn load_env(path_override: Option<PathBuf>) -> Result<(), String> {
    let path = match path_override {
        Some(path) => path,
        None => {
            let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            path.push("mp3ify/.env");
            if let Some(parent) = path.parent() {
                async_fs::create_dir_all(parent)
                    .await
                    .map_err(|e| e.to_string())?;
            }
            path
        }
    };

    // Existing process environment always wins over .env entries.
    let _ = dotenv::from_path(path);
    Ok(())
}

/// Platform data directory used for the cached API token.
pub fn token_cache_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("mp3ify/cache/token.json");
    path
}
