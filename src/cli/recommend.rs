use reqwest::Client;
use tabled::Table;

use crate::{
    error, info,
    mapping::{self, Source},
    spotify::{SpotifyClient, auth::SpotifyAuth, recommendations::RecommendationParams, search},
    success,
    utils::{self, GenreList},
    warning,
};

pub struct RecommendOptions {
    pub weather: Option<String>,
    pub mood: Option<String>,
    pub genres: Option<GenreList>,
    pub limit: u32,
}

/// Prints tracks for a genre list, a mood or a weather description.
///
/// Genres go to the recommendations endpoint (with audio features of the
/// weather when one is given); a mood or weather description runs the
/// keyword search used by the web UI.
pub async fn recommend(opts: RecommendOptions) {
    let config = super::load_config();
    if let Err(e) = config.require_spotify_credentials() {
        error!("{}", e);
    }

    let http = Client::new();
    let auth = SpotifyAuth::new(http.clone(), &config);
    let spotify = SpotifyClient::new(http, &config.spotify_api_url);

    let pb = super::spinner("Requesting app token...");
    let token = match auth.client_credentials().await {
        Ok(token) => token,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to get Spotify token. Err: {}", e);
        }
    };

    let result = match (&opts.genres, &opts.mood, &opts.weather) {
        (Some(genres), _, weather) if !genres.is_empty() => {
            pb.set_message(format!("Fetching recommendations for {}...", genres));
            let mut params = RecommendationParams {
                limit: Some(opts.limit),
                ..RecommendationParams::for_genres(genres.clone().into_vec())
            };
            if let Some(weather) = weather {
                params = params.with_audio_features(mapping::audio_features_for_weather(weather));
            }
            spotify.recommendations(&token, &params).await
        }
        (_, Some(mood), _) => {
            pb.set_message(format!("Searching tracks for mood '{}'...", mood));
            search::discover_tracks(&spotify, &token, mood, Source::Mood).await
        }
        (_, _, Some(weather)) => {
            pb.set_message(format!("Searching tracks for '{}'...", weather));
            search::discover_tracks(&spotify, &token, weather, Source::Weather).await
        }
        _ => {
            pb.finish_and_clear();
            error!("Provide --genres, --mood or --weather");
        }
    };
    pb.finish_and_clear();

    let mut tracks = match result {
        Ok(tracks) => tracks,
        Err(e) => error!("{}", e.user_message()),
    };
    tracks.truncate(opts.limit as usize);

    if tracks.is_empty() {
        warning!("No tracks found");
        return;
    }

    println!("{}", Table::new(utils::track_table_rows(&tracks)));
    success!("Found {} tracks", tracks.len());
    if let Some(mood) = &opts.mood {
        let weather = opts.weather.as_deref().unwrap_or("local");
        info!(
            "{}",
            mapping::follow_up_message(Some(mood), Some(weather), None, None)
        );
    }
}
