//! Playlist Converter CLI Library
//!
//! This library converts playlists between Spotify and YouTube. One platform's
//! playlist is read in full, each item is matched against the other platform's
//! search, matches are appended to a destination playlist, and the whole run is
//! recorded in an append-only result ledger.
//!
//! # Modules
//!
//! - `api` - HTTP API endpoints for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `convert` - The conversion orchestrator
//! - `error` - Typed error taxonomy for the conversion engine
//! - `history` - Persisted conversion records
//! - `oauth` - OAuth token lifecycle management, one manager per provider
//! - `platform` - Platform adapter and pacing traits
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API adapter
//! - `token` - Token store abstraction (memory and file backed)
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `youtube` - YouTube Data API adapter

pub mod api;
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod history;
pub mod oauth;
pub mod platform;
pub mod server;
pub mod spotify;
pub mod token;
pub mod types;
pub mod utils;
pub mod youtube;

/// Prints an informational message with a blue bullet point.
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Starting conversion...");
/// info!("Found {} items", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication completed successfully");
/// success!("Converted {} items", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// This macro terminates the program with exit code 1 after printing. It is
/// reserved for the CLI layer; library code propagates typed errors instead.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues or important information that users should
/// notice, e.g. a source item without a destination match.
///
/// # Example
///
/// ```
/// warning!("No match found for {}", item.name);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
