//! Configuration management for moodmix.
//!
//! Values come from environment variables, optionally seeded from `.env`
//! files. Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory (`<data_local_dir>/moodmix/.env`)
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::error::{Error, Res};

pub const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const SPOTIFY_API_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const SPOTIFY_API_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const OPENWEATHER_API_URL: &str = "https://api.openweathermap.org";
pub const NOMINATIM_API_URL: &str = "https://nominatim.openstreetmap.org";
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const OPENAI_MODEL: &str = "gpt-3.5-turbo-0125";
pub const SERVER_ADDRESS: &str = "127.0.0.1:3000";
/// Thirty days of inactivity end a session.
pub const DEFAULT_SESSION_MAX_AGE: u64 = 30 * 24 * 60 * 60;

/// Loads environment variables from `.env` files.
///
/// The working-directory file is read first, then
/// `<data_local_dir>/moodmix/.env`. Neither file is required; variables that
/// are already set are never overwritten.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub async fn load_env() -> Res<()> {
    dotenv::dotenv().ok();

    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| Error::Config(e.to_string()))?;
    }
    Ok(())
}

/// Location of the per-user `.env` file.
pub fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("moodmix/.env");
    path
}

/// Typed runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub public_base_url: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_redirect_uri: String,
    pub spotify_api_url: String,
    pub spotify_auth_url: String,
    pub spotify_token_url: String,
    pub openweather_api_key: Option<String>,
    pub openweather_api_url: String,
    pub nominatim_api_url: String,
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub openai_model: String,
    pub session_secret: String,
    pub session_max_age: Duration,
    pub token_refresh_skew: Duration,
    pub assets_dir: PathBuf,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// Spotify credentials and the session secret may be empty here; the
    /// server checks them with [`Config::require_server_secrets`] before it
    /// starts, while CLI commands only need the parts they touch.
    pub fn from_env() -> Res<Self> {
        let server_addr = var_or("SERVER_ADDRESS", SERVER_ADDRESS);
        let public_base_url = var("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://{server_addr}"))
            .trim_end_matches('/')
            .to_string();
        let spotify_redirect_uri = var("SPOTIFY_REDIRECT_URI")
            .unwrap_or_else(|| format!("{public_base_url}/api/auth/callback"));

        Ok(Config {
            spotify_client_id: var("SPOTIFY_CLIENT_ID").unwrap_or_default(),
            spotify_client_secret: var("SPOTIFY_CLIENT_SECRET").unwrap_or_default(),
            spotify_redirect_uri,
            spotify_api_url: var_or("SPOTIFY_API_URL", SPOTIFY_API_URL),
            spotify_auth_url: var_or("SPOTIFY_API_AUTH_URL", SPOTIFY_API_AUTH_URL),
            spotify_token_url: var_or("SPOTIFY_API_TOKEN_URL", SPOTIFY_API_TOKEN_URL),
            openweather_api_key: var("OPENWEATHER_API_KEY"),
            openweather_api_url: var_or("OPENWEATHER_API_URL", OPENWEATHER_API_URL),
            nominatim_api_url: var_or("NOMINATIM_API_URL", NOMINATIM_API_URL),
            openai_api_key: var("OPENAI_API_KEY"),
            openai_api_url: var_or("OPENAI_API_URL", OPENAI_API_URL),
            openai_model: var_or("OPENAI_MODEL", OPENAI_MODEL),
            session_secret: var("SESSION_SECRET").unwrap_or_default(),
            session_max_age: Duration::from_secs(parse_secs(
                "SESSION_MAX_AGE",
                DEFAULT_SESSION_MAX_AGE,
            )?),
            token_refresh_skew: Duration::from_secs(parse_secs("TOKEN_REFRESH_SKEW", 5)?),
            assets_dir: PathBuf::from(var_or("ASSETS_DIR", "assets")),
            server_addr,
            public_base_url,
        })
    }

    /// Fails when a secret the web server cannot run without is missing.
    pub fn require_server_secrets(&self) -> Res<()> {
        let mut missing = Vec::new();
        if self.spotify_client_id.is_empty() {
            missing.push("SPOTIFY_CLIENT_ID");
        }
        if self.spotify_client_secret.is_empty() {
            missing.push("SPOTIFY_CLIENT_SECRET");
        }
        if self.session_secret.is_empty() {
            missing.push("SESSION_SECRET");
        }
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }
        if self.session_secret.len() < 32 {
            return Err(Error::Config(
                "SESSION_SECRET must be at least 32 bytes long".to_string(),
            ));
        }
        Ok(())
    }

    /// Fails when the Spotify client credentials are missing.
    pub fn require_spotify_credentials(&self) -> Res<()> {
        if self.spotify_client_id.is_empty() || self.spotify_client_secret.is_empty() {
            return Err(Error::Config(
                "SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET must be set".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.public_base_url.starts_with("https://")
    }
}

impl Default for Config {
    /// Defaults with no credentials, pointing at the public services.
    fn default() -> Self {
        let public_base_url = format!("http://{SERVER_ADDRESS}");
        Config {
            server_addr: SERVER_ADDRESS.to_string(),
            spotify_client_id: String::new(),
            spotify_client_secret: String::new(),
            spotify_redirect_uri: format!("{public_base_url}/api/auth/callback"),
            spotify_api_url: SPOTIFY_API_URL.to_string(),
            spotify_auth_url: SPOTIFY_API_AUTH_URL.to_string(),
            spotify_token_url: SPOTIFY_API_TOKEN_URL.to_string(),
            openweather_api_key: None,
            openweather_api_url: OPENWEATHER_API_URL.to_string(),
            nominatim_api_url: NOMINATIM_API_URL.to_string(),
            openai_api_key: None,
            openai_api_url: OPENAI_API_URL.to_string(),
            openai_model: OPENAI_MODEL.to_string(),
            session_secret: String::new(),
            session_max_age: Duration::from_secs(DEFAULT_SESSION_MAX_AGE),
            token_refresh_skew: Duration::from_secs(5),
            assets_dir: PathBuf::from("assets"),
            public_base_url,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|| default.to_string())
}

fn parse_secs(key: &str, default: u64) -> Res<u64> {
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::Config(format!("{key} must be a number of seconds, got {raw:?}"))),
        None => Ok(default),
    }
}
