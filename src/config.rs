//! Configuration management for the playlist converter.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. Provider credentials are required
//! and panic early when missing; endpoint URLs default to the real provider
//! endpoints and can be overridden for testing.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use dotenv;
use std::{env, path::PathBuf};

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from `tunebridge/.env` under the platform-specific
/// local data directory. This allows users to store credentials without
/// hardcoding sensitive values.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created. A missing
/// `.env` file is tolerated so that configuration can come entirely from the
/// process environment.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tunebridge/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    let _ = dotenv::from_path(path);
    Ok(())
}

fn required(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("{} must be set", name))
}

fn with_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Returns the server address for the local OAuth callback server.
pub fn server_addr() -> String {
    with_default("SERVER_ADDRESS", "127.0.0.1:8888")
}

/// Returns the Spotify API client ID.
///
/// # Panics
///
/// Panics if the `SPOTIFY_CLIENT_ID` environment variable is not set.
pub fn spotify_client_id() -> String {
    required("SPOTIFY_CLIENT_ID")
}

/// Returns the Spotify API client secret.
///
/// # Panics
///
/// Panics if the `SPOTIFY_CLIENT_SECRET` environment variable is not set.
///
/// # Security Note
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
pub fn spotify_client_secret() -> String {
    required("SPOTIFY_CLIENT_SECRET")
}

/// Returns the Spotify OAuth redirect URI.
///
/// Must match a redirect URI registered in the Spotify application settings
/// exactly, including protocol, host, port and path.
pub fn spotify_redirect_uri() -> String {
    with_default(
        "SPOTIFY_REDIRECT_URI",
        "http://127.0.0.1:8888/callback/spotify",
    )
}

/// Returns the scope requested during Spotify authorization.
pub fn spotify_scope() -> String {
    with_default(
        "SPOTIFY_SCOPE",
        "playlist-modify-public playlist-modify-private",
    )
}

/// Returns the Spotify OAuth authorization endpoint.
pub fn spotify_auth_url() -> String {
    with_default("SPOTIFY_AUTH_URL", "https://accounts.spotify.com/authorize")
}

/// Returns the Spotify OAuth token endpoint.
pub fn spotify_token_url() -> String {
    with_default(
        "SPOTIFY_TOKEN_URL",
        "https://accounts.spotify.com/api/token",
    )
}

/// Returns the Spotify Web API base URL.
pub fn spotify_api_url() -> String {
    with_default("SPOTIFY_API_URL", "https://api.spotify.com/v1")
}

/// Returns the Google OAuth client ID used for YouTube.
///
/// # Panics
///
/// Panics if the `YOUTUBE_CLIENT_ID` environment variable is not set.
pub fn youtube_client_id() -> String {
    required("YOUTUBE_CLIENT_ID")
}

/// Returns the Google OAuth client secret used for YouTube.
///
/// # Panics
///
/// Panics if the `YOUTUBE_CLIENT_SECRET` environment variable is not set.
pub fn youtube_client_secret() -> String {
    required("YOUTUBE_CLIENT_SECRET")
}

/// Returns the YouTube Data API key used for unauthenticated search calls.
///
/// # Panics
///
/// Panics if the `YOUTUBE_API_KEY` environment variable is not set.
pub fn youtube_api_key() -> String {
    required("YOUTUBE_API_KEY")
}

/// Returns the YouTube OAuth redirect URI.
pub fn youtube_redirect_uri() -> String {
    with_default(
        "YOUTUBE_REDIRECT_URI",
        "http://127.0.0.1:8888/callback/youtube",
    )
}

/// Returns the scope requested during YouTube authorization.
pub fn youtube_scope() -> String {
    with_default(
        "YOUTUBE_SCOPE",
        "https://www.googleapis.com/auth/youtube https://www.googleapis.com/auth/youtube.force-ssl",
    )
}

/// Returns the Google OAuth authorization endpoint.
pub fn youtube_auth_url() -> String {
    with_default(
        "YOUTUBE_AUTH_URL",
        "https://accounts.google.com/o/oauth2/v2/auth",
    )
}

/// Returns the Google OAuth token endpoint.
pub fn youtube_token_url() -> String {
    with_default("YOUTUBE_TOKEN_URL", "https://oauth2.googleapis.com/token")
}

/// Returns the YouTube Data API base URL.
pub fn youtube_api_url() -> String {
    with_default("YOUTUBE_API_URL", "https://www.googleapis.com/youtube/v3")
}
