use reqwest::Client;

use crate::{
    assistant::{LlmClient, MoodRequest},
    error, info, mapping, success,
};

pub async fn chat(message: String, weather: Option<String>, location: Option<String>) {
    let config = super::load_config();
    if config.openai_api_key.is_none() {
        error!("OPENAI_API_KEY is not set");
    }
    let client = LlmClient::new(Client::new(), &config);

    if mapping::is_song_info_request(&message) {
        info!("Song and artist questions are answered best in the web UI");
    } else if mapping::is_playlist_modification(&message) {
        info!("Tuning the current mix to your request");
    }

    let request = MoodRequest {
        message,
        weather_description: weather.unwrap_or_else(|| "clear sky".to_string()),
        location: location.unwrap_or_default(),
        ..Default::default()
    };

    let pb = super::spinner("Asking the mood assistant...");
    let result = client.analyze_mood(&request).await;
    pb.finish_and_clear();

    let analysis = match result {
        Ok(analysis) => analysis,
        Err(e) => error!("Failed to analyze mood. Err: {}", e),
    };

    if !analysis.display_title.is_empty() {
        success!("{}", analysis.display_title);
    }
    println!("{}", analysis.response);
    info!("Mood: {}", analysis.mood_analysis);
    info!("Genres: {}", analysis.genres.join(", "));
    if analysis.should_refresh_playlist {
        info!("A new playlist would replace the weather playlist");
    } else {
        info!("Keeping the weather playlist");
    }
    info!("Try: {}", analysis.suggested_actions.join(" | "));
}
