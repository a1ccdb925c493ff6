//! moodmix library
//!
//! Weather-driven music discovery. The library looks up current weather for
//! a location, maps the conditions (or a free-text mood) to music genres,
//! asks the Spotify Web API for matching tracks and can save them as a
//! playlist. A hosted language model lets the user steer the genre choice in
//! plain words.
//!
//! # Modules
//!
//! - `api` - HTTP handlers behind the web server
//! - `assistant` - language-model client for mood analysis and city insights
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Shared error type and the `Res` alias
//! - `management` - Token lifecycle, signed session cookies, per-client rate limiting
//! - `mapping` - Static weather/mood to genre tables
//! - `server` - Router assembly and the HTTP server loop
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `weather` - OpenWeather and Nominatim clients

pub mod api;
pub mod assistant;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod mapping;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod weather;

pub use error::{Error, Res};

/// Prints an informational message with a blue bullet point.
///
/// Used by the CLI for status updates; the server logs through `tracing`.
///
/// # Example
///
/// ```
/// info!("Looking up weather for {}", location);
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
/// success!("Playlist created");
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
/// Only for fatal CLI errors; never call this from request handlers.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
