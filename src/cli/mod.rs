//! # CLI Module
//!
//! Terminal front end for moodmix. Every command drives the same library
//! code as the web server, so the CLI is also the quickest way to check a
//! configuration without a browser.
//!
//! ## Commands
//!
//! - [`serve`] - runs the web server and optionally opens the UI
//! - [`weather`] - current conditions and the genre mapping for a location
//! - [`suggest`] - location search suggestions, by name or by coordinates
//! - [`mapping`] - genre mapping tables for a weather description
//! - [`recommend`] - tracks for a weather description, a mood or a genre list
//! - [`chat`] - asks the mood assistant which genres fit a message
//!
//! Commands report progress with the crate's `info!`/`success!`/`warning!`
//! macros and spinners; fatal problems end the process through `error!`.
//! Catalog calls from the CLI use an app-only token from the client
//! credentials grant, so no browser login is needed.

mod chat;
mod mapping;
mod recommend;
mod serve;
mod weather;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{config::Config, error};

pub use chat::chat;
pub use mapping::mapping;
pub use recommend::{RecommendOptions, recommend};
pub use serve::serve;
pub use weather::{suggest, weather};

pub(crate) fn load_config() -> Config {
    match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration. Err: {}", e),
    }
}

pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
