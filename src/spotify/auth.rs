use std::{sync::Arc, time::Duration};

use reqwest::{Client, Url};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    config::Config,
    error::{Error, Res},
    types::Token,
    utils,
};

/// Permissions requested during login.
pub const SCOPES: &[&str] = &[
    "user-read-email",
    "playlist-modify-public",
    "playlist-modify-private",
    "user-library-read",
    "streaming",
    "user-read-private",
    "user-top-read",
    "playlist-read-private",
    "playlist-read-collaborative",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-currently-playing",
    "user-read-recently-played",
    "user-follow-read",
    "user-follow-modify",
];

const TOKEN_TIMEOUT: Duration = Duration::from_secs(10);

/// OAuth client for the Spotify accounts service.
///
/// Every call to the token endpoint authenticates with HTTP Basic
/// `client_id:client_secret`.
#[derive(Clone)]
pub struct SpotifyAuth {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
    skew: Duration,
    app_token: Arc<Mutex<Option<(String, i64)>>>,
}

impl SpotifyAuth {
    pub fn new(http: Client, config: &Config) -> Self {
        SpotifyAuth {
            http,
            client_id: config.spotify_client_id.clone(),
            client_secret: config.spotify_client_secret.clone(),
            redirect_uri: config.spotify_redirect_uri.clone(),
            auth_url: config.spotify_auth_url.clone(),
            token_url: config.spotify_token_url.clone(),
            skew: config.token_refresh_skew,
            app_token: Arc::new(Mutex::new(None)),
        }
    }

    /// Authorization URL the browser is redirected to on login.
    pub fn authorize_url(&self, state: &str) -> Res<String> {
        let scope = SCOPES.join(" ");
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("state", state),
                ("scope", scope.as_str()),
                ("show_dialog", "true"),
            ],
        )
        .map_err(|e| Error::Config(format!("invalid SPOTIFY_API_AUTH_URL: {e}")))?;
        Ok(url.to_string())
    }

    /// Trades the authorization `code` from the callback for user tokens.
    ///
    /// # Arguments
    ///
    /// * `code` - The `code` query parameter Spotify appended to the redirect
    ///
    /// # Errors
    ///
    /// [`Error::Upstream`] carrying the accounts service's
    /// `error_description` when the code is unknown, used or expired.
    pub async fn exchange_code(&self, code: &str) -> Res<Token> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
    }

    /// New access token for a stored refresh token.
    ///
    /// The answer carries a new refresh token only when Spotify rotates it;
    /// callers keep the old one otherwise.
    ///
    /// # Errors
    ///
    /// [`Error::Upstream`] when the grant is refused, typically
    /// `invalid_grant` after the user revoked access.
    pub async fn refresh_token(&self, refresh_token: &str) -> Res<Token> {
        let token = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;
        info!(
            expires_in = token.expires_in,
            token_type = %token.token_type,
            "token refresh successful"
        );
        Ok(token)
    }

    /// App-only access token from the client-credentials grant.
    ///
    /// The token is cached until it is within the refresh skew of expiring.
    pub async fn client_credentials(&self) -> Res<String> {
        let mut cached = self.app_token.lock().await;
        let now = utils::now_timestamp();
        if let Some((token, expires_at)) = cached.as_ref() {
            if now < expires_at - self.skew.as_secs() as i64 {
                return Ok(token.clone());
            }
        }

        debug!("requesting client-credentials token");
        let token = self
            .token_request(&[("grant_type", "client_credentials")])
            .await?;
        *cached = Some((
            token.access_token.clone(),
            now + token.expires_in as i64,
        ));
        Ok(token.access_token)
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Res<Token> {
        let res = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .timeout(TOKEN_TIMEOUT)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body: Value = res.json().await.unwrap_or(Value::Null);
            let message = body["error_description"]
                .as_str()
                .or_else(|| body["error"].as_str())
                .unwrap_or("token request failed")
                .to_string();
            return Err(Error::upstream("Spotify accounts", status.as_u16(), message));
        }

        Ok(res.json::<Token>().await?)
    }
}
