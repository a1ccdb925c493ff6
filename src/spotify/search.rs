use tracing::{error, info, warn};

use crate::{
    error::Res,
    mapping,
    types::{SearchResponse, Track},
    utils,
};

use super::SpotifyClient;

pub use crate::mapping::Source;

pub const SEARCH_LIMIT: u32 = 20;
pub const FALLBACK_LIMIT: u32 = 25;
pub const MAX_QUERIES: usize = 3;
pub const MAX_TRACKS: usize = 25;
pub const MAX_FALLBACK_TRACKS: usize = 20;
pub const MARKET: &str = "US";

impl SpotifyClient {
    /// One page of track search results for `query` in the US market.
    pub async fn search_tracks(&self, token: &str, query: &str, limit: u32) -> Res<Vec<Track>> {
        let params = vec![
            ("q".to_string(), query.to_string()),
            ("type".to_string(), "track".to_string()),
            ("limit".to_string(), limit.to_string()),
            ("market".to_string(), MARKET.to_string()),
        ];
        let res: SearchResponse = self.get("/search", token, &params).await?;
        Ok(res.tracks.map(|p| p.items).unwrap_or_default())
    }
}

/// Keyword search for a weather description or mood.
///
/// Runs up to three searches picked by the genre mapper, skipping searches
/// that fail, then removes duplicates and keeps 25 tracks. When nothing comes
/// back a single fallback search is tried.
pub async fn discover_tracks(
    client: &SpotifyClient,
    token: &str,
    description: &str,
    source: Source,
) -> Res<Vec<Track>> {
    let queries = mapping::search_queries(description, source, &mut rand::rng());
    info!(?queries, "searching tracks");

    let mut all_tracks: Vec<Track> = Vec::new();
    for query in queries.iter().take(MAX_QUERIES) {
        match client.search_tracks(token, query, SEARCH_LIMIT).await {
            Ok(tracks) => {
                info!(query = %query, count = tracks.len(), "search returned tracks");
                all_tracks.extend(tracks);
            }
            Err(e) => warn!(query = %query, error = %e, "search failed"),
        }
    }

    utils::remove_duplicate_tracks(&mut all_tracks);
    all_tracks.truncate(MAX_TRACKS);

    if all_tracks.is_empty() {
        return fallback_search(client, token, description).await;
    }

    info!(count = all_tracks.len(), "returning unique tracks");
    Ok(all_tracks)
}

async fn fallback_search(client: &SpotifyClient, token: &str, description: &str) -> Res<Vec<Track>> {
    let term = mapping::fallback_search_term(description);
    info!(term, "fallback search");

    match client.search_tracks(token, term, FALLBACK_LIMIT).await {
        Ok(mut tracks) => {
            tracks.truncate(MAX_FALLBACK_TRACKS);
            Ok(tracks)
        }
        Err(e) => {
            error!(error = %e, "fallback search failed");
            Err(e)
        }
    }
}
