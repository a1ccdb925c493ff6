use std::time::Duration;

use tracing::{info, warn};

use crate::{
    spotify::auth::SpotifyAuth,
    types::{SessionToken, Token},
    utils,
};

pub const REFRESH_ERROR: &str = "RefreshAccessTokenError";

/// Keeps a session's access token fresh.
///
/// A token counts as expired `skew` before its real expiry so that requests
/// issued right after the check still carry a valid token.
pub struct TokenManager {
    token: SessionToken,
    skew: Duration,
    refreshed: bool,
}

impl TokenManager {
    pub fn new(token: SessionToken, skew: Duration) -> Self {
        TokenManager {
            token,
            skew,
            refreshed: false,
        }
    }

    /// Returns a usable access token, refreshing it first when it expired.
    ///
    /// `None` means the session holds no usable credentials: either it never
    /// had a refresh token or the refresh call failed. In the latter case the
    /// session is marked with [`REFRESH_ERROR`].
    pub async fn get_valid_token(&mut self, auth: &SpotifyAuth) -> Option<String> {
        if !self.is_expired() {
            return self.token.access_token.clone();
        }

        let Some(refresh_token) = self.token.refresh_token.clone() else {
            return None;
        };

        info!("access token expired, refreshing");
        match auth.refresh_token(&refresh_token).await {
            Ok(token) => {
                self.apply_refresh(token, utils::now_timestamp());
                self.token.access_token.clone()
            }
            Err(e) => {
                warn!(error = %e, has_refresh_token = true, "token refresh failed");
                self.mark_refresh_failed();
                None
            }
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(utils::now_timestamp())
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        if self.token.access_token.is_none() {
            return true;
        }
        match self.token.expires_at {
            Some(expires_at) => now >= expires_at - self.skew.as_secs() as i64,
            None => true,
        }
    }

    /// Stores a freshly issued token; the old refresh token is kept when the
    /// provider does not rotate it.
    ///
    /// The grant also restarts the session's max age.
    ///
    /// # Arguments
    ///
    /// * `token` - Answer of the token endpoint
    /// * `now` - Unix timestamp the grant is dated at
    pub fn apply_refresh(&mut self, token: Token, now: i64) {
        self.token.access_token = Some(token.access_token);
        if let Some(rt) = token.refresh_token {
            self.token.refresh_token = Some(rt);
        }
        self.token.expires_at = Some(now + token.expires_in as i64);
        self.token.issued_at = now;
        self.token.error = None;
        self.refreshed = true;
    }

    /// Drops the access token and records [`REFRESH_ERROR`]; the refresh
    /// token stays so a later request can try again.
    pub fn mark_refresh_failed(&mut self) {
        self.token.access_token = None;
        self.token.expires_at = None;
        self.token.error = Some(REFRESH_ERROR.to_string());
        self.refreshed = true;
    }

    /// Whether the token changed and the session cookie must be re-issued.
    pub fn refreshed(&self) -> bool {
        self.refreshed
    }

    pub fn current_token(&self) -> &SessionToken {
        &self.token
    }

    pub fn into_token(self) -> SessionToken {
        self.token
    }
}
