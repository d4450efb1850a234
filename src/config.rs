//! Configuration management for spotedit.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Values are read in this order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Spotify defaults for the public endpoints and the OAuth scope
//!
//! The client id, redirect URI and callback server address have no default and
//! must be provided by the user.

use std::{env, path::PathBuf};

use thiserror::Error;

pub const APP_DIR: &str = "spotedit";

const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_SCOPE: &str = "playlist-modify-private \
    playlist-modify-public \
    playlist-read-private \
    playlist-read-collaborative \
    user-follow-read \
    user-follow-modify \
    user-library-read \
    user-library-modify";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set (environment or spotedit/.env)")]
    Missing(&'static str),

    #[error("cannot prepare configuration directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse .env file: {0}")]
    Dotenv(#[from] dotenv::Error),
}

/// Returns the platform-specific data directory used by spotedit.
///
/// - Linux: `~/.local/share/spotedit`
/// - macOS: `~/Library/Application Support/spotedit`
/// - Windows: `%LOCALAPPDATA%/spotedit`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Loads environment variables from `.env` in the local data directory.
///
/// Creates the data directory if needed. A missing `.env` file is fine, every
/// value can also come from the process environment; a malformed one is an error.
pub async fn load_env() -> Result<(), ConfigError> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir).await?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path)?;
        log::debug!("loaded environment from {}", path.display());
    } else {
        log::debug!("no .env file at {}", path.display());
    }
    Ok(())
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    env::var(var).map_err(|_| ConfigError::Missing(var))
}

fn with_default(var: &str, default: &str) -> String {
    env::var(var).unwrap_or_else(|_| default.to_string())
}

/// Address the local OAuth callback server binds to, e.g. `127.0.0.1:8080`.
pub fn server_addr() -> Result<String, ConfigError> {
    required("SERVER_ADDRESS")
}

/// Client id of the application registered with Spotify.
pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Callback URL registered for the application, e.g. `http://127.0.0.1:8080/callback`.
pub fn spotify_redirect_uri() -> Result<String, ConfigError> {
    required("SPOTIFY_API_REDIRECT_URI")
}

pub fn spotify_scope() -> String {
    with_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

pub fn spotify_apiauth_url() -> String {
    with_default("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Base URL of the Web API, without a trailing slash.
pub fn spotify_apiurl() -> String {
    with_default("SPOTIFY_API_URL", DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}

pub fn spotify_apitoken_url() -> String {
    with_default("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}
