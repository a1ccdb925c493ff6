use tracing::{debug, error, info};

use crate::{
    error::Res,
    mapping::AudioFeatures,
    types::{GenreSeedsResponse, RecommendationsResponse, Track},
};

use super::SpotifyClient;

/// Used when a request carries neither genre nor artist seeds.
pub const DEFAULT_ARTIST_SEED: &str = "4dpARuHxo51G3z768sgnrY";
const GENRE_SEEDS_KEY: &str = "spotify:available-genres";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationParams {
    pub genres: Vec<String>,
    pub artists: Vec<String>,
    pub valence: Option<f64>,
    pub energy: Option<f64>,
    pub tempo: Option<f64>,
    pub danceability: Option<f64>,
    pub limit: Option<u32>,
    pub market: Option<String>,
}

impl RecommendationParams {
    pub fn for_genres(genres: Vec<String>) -> Self {
        RecommendationParams {
            genres,
            ..Default::default()
        }
    }

    pub fn with_audio_features(mut self, features: AudioFeatures) -> Self {
        self.valence = Some(features.valence);
        self.energy = Some(features.energy);
        self.tempo = Some(features.tempo);
        self
    }

    /// Query string pairs in the order the endpoint documents them.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("limit".to_string(), self.limit.unwrap_or(20).to_string()),
            (
                "market".to_string(),
                self.market.clone().unwrap_or_else(|| "US".to_string()),
            ),
        ];

        let genres: Vec<&str> = self
            .genres
            .iter()
            .map(|g| g.trim())
            .filter(|g| !g.is_empty())
            .collect();
        let mut artists: Vec<&str> = self.artists.iter().map(String::as_str).collect();
        if genres.is_empty() && artists.is_empty() {
            debug!("no seeds provided, using default artist seed");
            artists.push(DEFAULT_ARTIST_SEED);
        }

        if !genres.is_empty() {
            pairs.push(("seed_genres".to_string(), genres.join(",")));
        }
        if !artists.is_empty() {
            pairs.push(("seed_artists".to_string(), artists.join(",")));
        }

        let targets = [
            ("target_valence", self.valence),
            ("target_energy", self.energy),
            ("target_tempo", self.tempo),
            ("target_danceability", self.danceability),
        ];
        for (key, value) in targets {
            if let Some(v) = value {
                pairs.push((key.to_string(), v.to_string()));
            }
        }
        pairs
    }

    /// Key the results are cached under; equal parameters give equal keys.
    pub fn cache_key(&self) -> String {
        let query = self
            .query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("recommendations:{query}")
    }
}

impl SpotifyClient {
    /// Seed-based recommendations, served from cache for five minutes.
    ///
    /// # Arguments
    ///
    /// * `token` - User or client-credentials access token
    /// * `params` - Seeds and targets; see [`RecommendationParams::query_pairs`]
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # async fn demo(client: &moodmix::spotify::SpotifyClient) -> moodmix::Res<()> {
    /// use moodmix::spotify::recommendations::RecommendationParams;
    ///
    /// let params = RecommendationParams::for_genres(vec!["jazz".to_string()]);
    /// let tracks = client.recommendations("access-token", &params).await?;
    /// println!("{} tracks", tracks.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn recommendations(&self, token: &str, params: &RecommendationParams) -> Res<Vec<Track>> {
        let key = params.cache_key();
        if let Some(tracks) = self.recommendations.get(&key) {
            debug!(%key, "recommendations cache hit");
            return Ok(tracks);
        }

        match self
            .get::<RecommendationsResponse>("/recommendations", token, &params.query_pairs())
            .await
        {
            Ok(res) => {
                info!(count = res.tracks.len(), "recommendations received");
                self.recommendations.insert(key, res.tracks.clone());
                Ok(res.tracks)
            }
            Err(e) => {
                error!(%key, error = %e, "recommendations request failed");
                Err(e)
            }
        }
    }

    /// Genre names accepted as `seed_genres`.
    pub async fn available_genre_seeds(&self, token: &str) -> Res<Vec<String>> {
        let key = GENRE_SEEDS_KEY.to_string();
        if let Some(genres) = self.genre_seeds.get(&key) {
            return Ok(genres);
        }

        let res: GenreSeedsResponse = self
            .get("/recommendations/available-genre-seeds", token, &[])
            .await?;
        self.genre_seeds.insert(key, res.genres.clone());
        Ok(res.genres)
    }
}
