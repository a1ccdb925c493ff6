use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};

use crate::{
    error::Res,
    mapping,
    server::AppState,
    spotify::recommendations::RecommendationParams,
    types::{Playlist, Track},
    utils,
};

use super::{AuthSession, json_error, music::catalog_genres};

const DEFAULT_NAME: &str = "Your Weather, Your Beats Playlist";
const DEFAULT_DESCRIPTION: &str = "Created by Your Weather, Your Beats";
const TRACK_URI_PREFIX: &str = "spotify:track:";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistBody {
    #[serde(default)]
    pub track_uris: Option<Vec<Value>>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub weather_description: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceTracksBody {
    #[serde(default)]
    pub uris: Vec<String>,
}

/// Keeps the strings that look like Spotify track URIs.
pub fn valid_track_uris(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(Value::as_str)
        .filter(|uri| uri.starts_with(TRACK_URI_PREFIX))
        .map(str::to_string)
        .collect()
}

fn created(playlist: &Playlist, name: &str, added: usize, kind: &str) -> Value {
    json!({
        "success": true,
        "playlistId": playlist.id,
        "playlistUrl": playlist.external_urls.spotify,
        "tracksAdded": added,
        "message": format!("Successfully created playlist \"{name}\" with {added} {kind}"),
    })
}

/// Saves either the given track URIs or fresh recommendations as a new
/// private playlist.
///
/// Recommendations are seeded with the requested `genres`, checked against
/// the catalog's genre seeds. Without genres the weather description picks
/// them instead.
pub async fn create_playlist(
    State(state): State<AppState>,
    session: AuthSession,
    Json(body): Json<CreatePlaylistBody>,
) -> Response {
    let name = body.name.clone().unwrap_or_else(|| DEFAULT_NAME.to_string());
    let description = body
        .description
        .clone()
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
    let cookie = AppendHeaders(session.set_cookie(&state));

    if let Some(values) = body.track_uris.as_ref().filter(|v| !v.is_empty()) {
        let uris = valid_track_uris(values);
        if uris.is_empty() {
            return json_error(StatusCode::BAD_REQUEST, "No valid Spotify track URIs provided");
        }
        info!(count = uris.len(), "saving existing tracks to playlist");

        let full_description = format!("{description} - {}", utils::today());
        return match save(&state, &session, &name, &full_description, &uris).await {
            Ok(playlist) => (cookie, Json(created(&playlist, &name, uris.len(), "tracks"))).into_response(),
            Err(e) => {
                error!(error = %e, "creating playlist with existing tracks failed");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to create playlist with provided tracks",
                )
            }
        };
    }

    let requested = body.genres.clone().filter(|g| !g.is_empty());
    let weather = body.weather_description.as_deref().filter(|w| !w.is_empty());
    if requested.is_some() || weather.is_some() {
        let available = catalog_genres(&state, &session).await;
        let genres = match (requested, weather) {
            (Some(genres), _) => mapping::validate_genres(&genres, &available),
            (None, Some(weather)) => mapping::catalog_genres_for_weather(weather, &available),
            (None, None) => Vec::new(),
        };
        if genres.is_empty() {
            return json_error(StatusCode::NOT_FOUND, "No tracks found for given parameters");
        }
        info!(?genres, "generating recommendations for playlist");

        let mut params = RecommendationParams {
            limit: Some(20),
            market: Some("US".to_string()),
            ..RecommendationParams::for_genres(genres)
        };
        if let Some(weather) = weather {
            params = params.with_audio_features(mapping::audio_features_for_weather(weather));
        }

        let tracks: Vec<Track> = match state
            .spotify
            .recommendations(&session.access_token, &params)
            .await
        {
            Ok(tracks) => tracks,
            Err(e) => return recommendation_failure(e),
        };
        if tracks.is_empty() {
            return json_error(StatusCode::NOT_FOUND, "No tracks found for given parameters");
        }

        let uris: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();
        let full_description = format!(
            "{description} - {} - {}",
            weather.unwrap_or_default(),
            utils::today()
        );
        return match save(&state, &session, &name, &full_description, &uris).await {
            Ok(playlist) => {
                let mut reply = created(&playlist, &name, tracks.len(), "recommendations");
                reply["tracks"] = json!(tracks);
                (cookie, Json(reply)).into_response()
            }
            Err(e) => recommendation_failure(e),
        };
    }

    json_error(
        StatusCode::BAD_REQUEST,
        "Invalid request: provide either 'trackUris' to save existing tracks or 'genres' to generate recommendations",
    )
}

fn recommendation_failure(e: crate::Error) -> Response {
    error!(error = %e, "generating recommendations failed");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to generate recommendations and create playlist",
    )
}

async fn save(
    state: &AppState,
    session: &AuthSession,
    name: &str,
    description: &str,
    uris: &[String],
) -> Res<Playlist> {
    let token = &session.access_token;
    let user = state.spotify.current_user(token).await?;
    state
        .spotify
        .create_playlist(token, &user.id, name, description, uris)
        .await
}

/// Replaces every item of an existing playlist.
pub async fn replace_playlist_tracks(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<String>,
    Json(body): Json<ReplaceTracksBody>,
) -> Response {
    match state
        .spotify
        .replace_tracks(&session.access_token, &id, &body.uris)
        .await
    {
        Ok(()) => (
            AppendHeaders(session.set_cookie(&state)),
            Json(json!({ "success": true, "tracks": body.uris.len() })),
        )
            .into_response(),
        Err(e) => {
            error!(playlist_id = %id, error = %e, "replacing playlist tracks failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.user_message() })),
            )
                .into_response()
        }
    }
}
