//! # Genre Mapping Module
//!
//! Static lookup tables that turn a weather description (as reported by
//! OpenWeather, e.g. `"light rain"`) or a free-text mood into music genres,
//! target audio features and search queries.
//!
//! Several tables exist because different consumers need different
//! vocabularies:
//!
//! - [`weather_mapping`] - genres plus valence/energy/danceability targets
//! - [`catalog_genres_for_weather`] - genres filtered against the catalog's seed list
//! - [`assistant_weather_genres`] - genres restricted to what the mood assistant may pick
//! - [`search_queries`] - keyword searches for the track search endpoint
//!
//! The chat helpers in [`mood`] drive the assistant UI.

mod genres;
pub mod mood;
mod weather;

pub use genres::{ASSISTANT_GENRES, assistant_genres, default_genres, validate_genres};
pub use mood::{
    activity_genres, chat_weather_genres, follow_up_message, is_playlist_modification,
    is_song_info_request, mood_suggestions, quick_actions, welcome_message,
};
pub use weather::{
    AudioFeatures, WEATHER_MAPPINGS, WeatherGenreMapping, assistant_weather_genres,
    audio_features_for_weather, catalog_genres_for_weather, fallback_search_term,
    search_queries, weather_mapping,
};

/// What a music search description refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Source {
    #[default]
    Weather,
    Mood,
}

impl Source {
    /// `"mood"` selects [`Source::Mood`]; anything else, including a missing
    /// value, is a weather description.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("mood") => Source::Mood,
            _ => Source::Weather,
        }
    }
}
