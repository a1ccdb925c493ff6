use axum::{
    Json,
    extract::Query,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::mapping;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingParams {
    pub weather_description: Option<String>,
    pub location: Option<String>,
}

/// Everything the page renders from the current weather alone.
pub async fn mapping(Query(params): Query<MappingParams>) -> Json<Value> {
    let description = params
        .weather_description
        .as_deref()
        .filter(|d| !d.trim().is_empty());
    let location = params.location.as_deref().filter(|l| !l.trim().is_empty());
    let weather = description.unwrap_or_default();

    let genre_mapping = mapping::weather_mapping(weather);
    let genres: Vec<String> = genre_mapping.genres.iter().map(|g| g.to_string()).collect();

    Json(json!({
        "mapping": genre_mapping,
        "audioFeatures": mapping::audio_features_for_weather(weather),
        "chatGenres": mapping::chat_weather_genres(description),
        "moodSuggestions": mapping::mood_suggestions(description),
        "welcomeMessage": mapping::welcome_message(description, location),
        "quickActions": mapping::quick_actions(&genres, weather, false),
    }))
}
