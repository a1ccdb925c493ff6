use reqwest::Method;
use tracing::info;

use crate::{
    error::Res,
    types::{CreatePlaylistRequest, Playlist, PlaylistTracksRequest, SnapshotResponse, UserProfile},
};

use super::SpotifyClient;

/// Largest number of URIs the playlist items endpoints accept per call.
pub const MAX_URIS_PER_REQUEST: usize = 100;

/// Cache key for the profile behind `token`: its last ten characters.
///
/// # Example
///
/// ```rust
/// use moodmix::spotify::playlist::profile_cache_key;
///
/// assert_eq!(profile_cache_key("BQDabc0123456789"), "profile:0123456789");
/// ```
pub fn profile_cache_key(token: &str) -> String {
    let tail_start = token
        .char_indices()
        .rev()
        .nth(9)
        .map(|(i, _)| i)
        .unwrap_or(0);
    format!("profile:{}", &token[tail_start..])
}

impl SpotifyClient {
    /// Profile of the token's owner, cached per token.
    pub async fn current_user(&self, token: &str) -> Res<UserProfile> {
        let key = profile_cache_key(token);
        if let Some(profile) = self.profiles.get(&key) {
            return Ok(profile);
        }

        let profile: UserProfile = self.get("/me", token, &[]).await?;
        self.profiles.insert(key, profile.clone());
        Ok(profile)
    }

    /// Creates a private playlist and fills it with `uris`.
    pub async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        name: &str,
        description: &str,
        uris: &[String],
    ) -> Res<Playlist> {
        let request = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: false,
        };
        let playlist: Playlist = self
            .send_json(
                Method::POST,
                &format!("/users/{user_id}/playlists"),
                token,
                &request,
            )
            .await?;
        info!(playlist_id = %playlist.id, %name, "playlist created");

        if !uris.is_empty() {
            self.add_tracks(token, &playlist.id, uris).await?;
        }
        Ok(playlist)
    }

    /// Appends `uris` in batches the endpoint accepts.
    pub async fn add_tracks(&self, token: &str, playlist_id: &str, uris: &[String]) -> Res<()> {
        for chunk in uris.chunks(MAX_URIS_PER_REQUEST) {
            let _: SnapshotResponse = self
                .send_json(
                    Method::POST,
                    &format!("/playlists/{playlist_id}/tracks"),
                    token,
                    &PlaylistTracksRequest {
                        uris: chunk.to_vec(),
                    },
                )
                .await?;
        }
        Ok(())
    }

    /// Replaces every item of the playlist with `uris`.
    pub async fn replace_tracks(&self, token: &str, playlist_id: &str, uris: &[String]) -> Res<()> {
        let (first, rest) = uris.split_at(uris.len().min(MAX_URIS_PER_REQUEST));
        let _: SnapshotResponse = self
            .send_json(
                Method::PUT,
                &format!("/playlists/{playlist_id}/tracks"),
                token,
                &PlaylistTracksRequest {
                    uris: first.to_vec(),
                },
            )
            .await?;

        if !rest.is_empty() {
            self.add_tracks(token, playlist_id, rest).await?;
        }
        Ok(())
    }
}
