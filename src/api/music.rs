use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::{
    error::Error,
    mapping::{self, Source},
    server::AppState,
    spotify::search,
};

use super::{AuthSession, json_error};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicParams {
    pub weather_description: Option<String>,
    pub source: Option<String>,
}

fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// Tracks for a weather description or a mood.
///
/// Checks run in order: client rate limit, Spotify session, description.
pub async fn music(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<MusicParams>,
) -> Response {
    let client = client_key(&headers);
    if !state.music_limiter.check(&client) {
        warn!(%client, "music rate limit exceeded");
        return Error::RateLimited.into_response();
    }

    let session = match AuthSession::from_headers(&headers, &state).await {
        Ok(session) => session,
        Err(e) => return e.into_response(),
    };

    let cookie = AppendHeaders(session.set_cookie(&state));
    let Some(description) = params.weather_description.filter(|d| !d.is_empty()) else {
        return (
            cookie,
            json_error(StatusCode::BAD_REQUEST, "Weather description required"),
        )
            .into_response();
    };
    let source = Source::parse(params.source.as_deref());
    info!(%description, ?source, "starting music search");

    match search::discover_tracks(&state.spotify, &session.access_token, &description, source).await {
        Ok(tracks) => (cookie, Json(tracks)).into_response(),
        Err(e) => {
            error!(error = %e, "music search failed");
            (
                cookie,
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not load any music recommendations",
                ),
            )
                .into_response()
        }
    }
}

/// Genre seeds accepted by the recommendations endpoint.
///
/// Falls back to a fixed list when the catalog cannot be reached.
pub async fn genres(State(state): State<AppState>, session: AuthSession) -> Response {
    let genres = catalog_genres(&state, &session).await;
    (
        AppendHeaders(session.set_cookie(&state)),
        Json(serde_json::json!({ "genres": genres })),
    )
        .into_response()
}

/// The catalog's genre seeds, or the built-in list when they are unavailable.
pub(super) async fn catalog_genres(state: &AppState, session: &AuthSession) -> Vec<String> {
    match state.spotify.available_genre_seeds(&session.access_token).await {
        Ok(genres) if !genres.is_empty() => genres,
        Ok(_) => mapping::default_genres(),
        Err(e) => {
            warn!(error = %e, "genre seeds unavailable, using defaults");
            mapping::default_genres()
        }
    }
}
