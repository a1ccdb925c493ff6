use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::error;

use crate::{error::Error, server::AppState};

use super::{json_error, json_error_details};

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
    pub q: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

pub async fn weather(State(state): State<AppState>, Query(params): Query<WeatherParams>) -> Response {
    let Some(location) = params.location.filter(|l| !l.trim().is_empty()) else {
        return json_error(StatusCode::BAD_REQUEST, "Location parameter is required");
    };
    if !state.weather.is_configured() {
        error!("OpenWeather API key is missing");
        return json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Weather service configuration error",
        );
    }

    match state.weather.lookup(&location).await {
        Ok(weather) => Json(weather).into_response(),
        Err(Error::NotFound(message)) => json_error(StatusCode::NOT_FOUND, &message),
        Err(e) => {
            error!(%location, error = %e, "weather lookup failed");
            json_error_details(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch weather data. Please try again or check the location name.",
                e.client_details(),
            )
        }
    }
}

/// Location labels for the search box, by partial name or by coordinates.
pub async fn city_suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestionParams>,
) -> Json<Vec<String>> {
    let suggestions = match (params.lat.as_deref(), params.lon.as_deref()) {
        (Some(lat), Some(lon)) if !lat.is_empty() && !lon.is_empty() => {
            match (lat.trim().parse::<f64>(), lon.trim().parse::<f64>()) {
                (Ok(lat), Ok(lon)) => state.weather.reverse_suggestions(lat, lon).await,
                _ => Vec::new(),
            }
        }
        _ => match params.q {
            Some(q) => state.weather.suggestions(&q).await,
            None => Vec::new(),
        },
    };
    Json(suggestions)
}
