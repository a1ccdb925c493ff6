//! # API Module
//!
//! HTTP handlers behind the moodmix web server. Every handler takes the
//! shared [`AppState`](crate::server::AppState) and answers JSON; the static
//! UI is served by the router's fallback.
//!
//! ## Endpoints
//!
//! ### Authentication
//! - `GET /api/auth/login`, `GET /api/auth/callback` - Spotify authorization code flow
//! - `POST /api/auth/refresh`, `GET /api/auth/session`, `POST /api/auth/logout`
//!
//! ### Weather
//! - `GET /api/weather` - current conditions for a location
//! - `GET /api/citysuggestions` - location search box suggestions
//!
//! ### Music
//! - `GET /api/music` - tracks for a weather description or mood
//! - `GET /api/mapping` - genre mapping and chat helpers for the UI
//! - `GET /api/spotify/genres` - available genre seeds
//! - `POST /api/spotify/create-playlist`, `PUT /api/spotify/playlists/{id}/tracks`
//!
//! ### Assistant
//! - `POST /api/chat/analyze-mood`, `POST /api/city-insights`
//!
//! ### Monitoring
//! - `GET /health`
//!
//! Routes that need a Spotify user take an [`AuthSession`], which answers
//! 401 on its own when the session cookie is missing or unusable.

mod auth;
mod chat;
mod health;
mod mapping;
mod music;
mod playlist;
pub mod session;
mod weather;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

pub use auth::{callback, login, logout, refresh, session};
pub use chat::{analyze_mood, city_insights};
pub use health::health;
pub use mapping::mapping;
pub use music::{genres, music};
pub use playlist::{create_playlist, replace_playlist_tracks};
pub use session::AuthSession;
pub use weather::{city_suggestions, weather};

/// `{"error": message}` with the given status.
pub fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// `{"error": message, "details": details}` with the given status.
pub fn json_error_details(status: StatusCode, message: &str, details: impl ToString) -> Response {
    (
        status,
        Json(json!({ "error": message, "details": details.to_string() })),
    )
        .into_response()
}
