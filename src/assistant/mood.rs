use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::Res,
    mapping::{self, ASSISTANT_GENRES},
    types::Track,
};

use super::LlmClient;

const MAX_CONTEXT_TRACKS: usize = 3;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatTrack {
    pub name: String,
}

/// Body of a mood chat request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub weather_description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub current_genre: Option<String>,
    #[serde(default)]
    pub current_tracks: Vec<ChatTrack>,
}

/// The JSON object the model is asked to return.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelMoodReply {
    pub keep_weather_playlist: bool,
    pub genres: Vec<String>,
    pub response: String,
    pub mood_analysis: String,
    pub display_title: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodAnalysis {
    pub keep_weather_playlist: bool,
    pub genres: Vec<String>,
    pub response: String,
    pub mood_analysis: String,
    pub display_title: String,
    pub should_refresh_playlist: bool,
    pub suggested_actions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Track>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn is_assistant_genre(genre: &str) -> bool {
    ASSISTANT_GENRES.contains(&genre)
}

/// Genres to play after a mood reply.
///
/// Keeping the weather playlist uses the weather genres. Otherwise the
/// model's picks that the assistant may use, then the activity genres of the
/// message under the same restriction, then the weather genres.
pub fn select_genres(reply: &ModelMoodReply, message: &str, weather_description: &str) -> Vec<String> {
    if reply.keep_weather_playlist {
        return mapping::assistant_weather_genres(weather_description);
    }

    let picked: Vec<String> = reply
        .genres
        .iter()
        .filter(|g| is_assistant_genre(g))
        .cloned()
        .collect();
    if !picked.is_empty() {
        return picked;
    }

    let from_activity: Vec<String> = mapping::activity_genres(message)
        .into_iter()
        .filter(|g| is_assistant_genre(g))
        .collect();
    if !from_activity.is_empty() {
        return from_activity;
    }

    mapping::assistant_weather_genres(weather_description)
}

pub fn build_prompt(request: &MoodRequest) -> String {
    let mut context = format!(
        "Weather is {} in {}.",
        request.weather_description, request.location
    );
    if let Some(genre) = request.current_genre.as_deref().filter(|g| !g.is_empty()) {
        context.push_str(&format!(" Currently playing genre: {genre}."));
    }
    let tracks: Vec<&str> = request
        .current_tracks
        .iter()
        .take(MAX_CONTEXT_TRACKS)
        .map(|t| t.name.as_str())
        .collect();
    if !tracks.is_empty() {
        context.push_str(&format!(" Current tracks include: {}.", tracks.join(", ")));
    }

    format!(
        r#"As a music expert, analyze this message: "{message}"
Current context: {context}

Your task is to understand if the user wants to:
1. Keep the weather-based playlist
2. Get a new playlist based on their mood

Available genres: {genres}

Provide an empathetic response and music recommendations that match their preference.

Return in this JSON format:
{{
  "keepWeatherPlaylist": boolean,
  "genres": string[],
  "response": string,
  "moodAnalysis": string,
  "displayTitle": string
}}"#,
        message = request.message,
        genres = ASSISTANT_GENRES.join(", "),
    )
}

impl MoodAnalysis {
    pub fn from_reply(reply: ModelMoodReply, request: &MoodRequest) -> Self {
        let genres = select_genres(&reply, &request.message, &request.weather_description);
        let suggested_actions = mapping::quick_actions(
            &genres,
            &request.weather_description,
            !request.current_tracks.is_empty(),
        );
        MoodAnalysis {
            should_refresh_playlist: !reply.keep_weather_playlist,
            keep_weather_playlist: reply.keep_weather_playlist,
            genres,
            response: reply.response,
            mood_analysis: reply.mood_analysis,
            display_title: reply.display_title,
            suggested_actions,
            recommendations: None,
            error: None,
        }
    }
}

impl LlmClient {
    pub async fn analyze_mood(&self, request: &MoodRequest) -> Res<MoodAnalysis> {
        let reply: ModelMoodReply = self.complete_json(&build_prompt(request)).await?;
        let analysis = MoodAnalysis::from_reply(reply, request);
        info!(
            genres = ?analysis.genres,
            refresh = analysis.should_refresh_playlist,
            "mood analyzed"
        );
        Ok(analysis)
    }
}
