use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{error, warn};

use crate::{
    assistant::MoodRequest,
    server::AppState,
    spotify::recommendations::RecommendationParams,
};

use super::{AuthSession, json_error, json_error_details};

#[derive(Debug, Default, Deserialize)]
pub struct CityInsightRequest {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub weather: Option<String>,
}

/// Lets the user steer the playlist with a free-text message.
///
/// With a Spotify session the reply also carries recommendations for the
/// chosen genres; a catalog failure there is reported in the reply instead
/// of failing the request.
pub async fn analyze_mood(
    State(state): State<AppState>,
    session: Option<AuthSession>,
    Json(request): Json<MoodRequest>,
) -> Response {
    if request.message.trim().is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "Message is required");
    }

    let mut analysis = match state.assistant.analyze_mood(&request).await {
        Ok(analysis) => analysis,
        Err(e) => {
            error!(error = %e, "mood analysis failed");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to analyze mood");
        }
    };

    let Some(session) = session else {
        return Json(analysis).into_response();
    };

    let params = RecommendationParams::for_genres(analysis.genres.clone());
    match state
        .spotify
        .recommendations(&session.access_token, &params)
        .await
    {
        Ok(tracks) => analysis.recommendations = Some(tracks),
        Err(e) => {
            warn!(error = %e, "recommendations for mood failed");
            analysis.error = Some("Failed to get Spotify recommendations".to_string());
        }
    }
    (AppendHeaders(session.set_cookie(&state)), Json(analysis)).into_response()
}

pub async fn city_insights(
    State(state): State<AppState>,
    Json(request): Json<CityInsightRequest>,
) -> Response {
    let Some(city) = request.city.filter(|c| !c.trim().is_empty()) else {
        return json_error(StatusCode::BAD_REQUEST, "city is required");
    };

    match state
        .assistant
        .city_insights(&city, request.weather.as_deref())
        .await
    {
        Ok(insight) => Json(insight).into_response(),
        Err(e) => {
            error!(%city, error = %e, "city insights failed");
            json_error_details(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch city insights",
                e.client_details(),
            )
        }
    }
}
