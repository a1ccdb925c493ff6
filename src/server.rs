use std::{net::SocketAddr, str::FromStr, sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderName, Method, header},
    routing::{get, post, put},
};
use reqwest::Client;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{debug, info};

use crate::{
    api,
    assistant::LlmClient,
    config::Config,
    error::{Error, Res},
    management::{ClientLimiter, SessionCodec},
    spotify::{SpotifyClient, auth::SpotifyAuth},
    weather::WeatherClient,
};

/// Requests per client allowed on the music endpoint within [`MUSIC_RATE_WINDOW`].
pub const MUSIC_RATE_LIMIT: u32 = 10;
pub const MUSIC_RATE_WINDOW: Duration = Duration::from_secs(60);
/// How often expired cache entries and idle rate-limit keys are dropped.
pub const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(5 * 60);

const ALLOWED_HEADERS: &[&str] = &[
    "x-csrf-token",
    "x-requested-with",
    "accept",
    "accept-version",
    "content-length",
    "content-md5",
    "content-type",
    "date",
    "x-api-version",
    "authorization",
];

/// Shared handles every request handler receives.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub spotify: Arc<SpotifyClient>,
    pub auth: SpotifyAuth,
    pub weather: WeatherClient,
    pub assistant: LlmClient,
    pub sessions: SessionCodec,
    pub music_limiter: Arc<ClientLimiter>,
}

impl AppState {
    pub fn new(config: Config) -> Res<Self> {
        let http = Client::builder().build()?;
        Ok(AppState {
            spotify: Arc::new(SpotifyClient::new(http.clone(), &config.spotify_api_url)),
            auth: SpotifyAuth::new(http.clone(), &config),
            weather: WeatherClient::new(http.clone(), &config),
            assistant: LlmClient::new(http, &config),
            sessions: SessionCodec::new(&config.session_secret),
            music_limiter: Arc::new(ClientLimiter::new(MUSIC_RATE_LIMIT, MUSIC_RATE_WINDOW)),
            config: Arc::new(config),
        })
    }
}

fn cors() -> CorsLayer {
    let headers: Vec<HeaderName> = ALLOWED_HEADERS
        .iter()
        .copied()
        .map(HeaderName::from_static)
        .collect();

    // credentials cannot be combined with a wildcard origin
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::DELETE,
            Method::PATCH,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ])
        .allow_headers(headers)
        .expose_headers([header::SET_COOKIE])
}

/// All routes, the static UI and the shared middleware.
pub fn router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.assets_dir);

    Router::new()
        .route("/health", get(api::health))
        .route("/api/auth/login", get(api::login))
        .route("/api/auth/callback", get(api::callback))
        .route("/api/auth/refresh", post(api::refresh))
        .route("/api/auth/session", get(api::session))
        .route("/api/auth/logout", post(api::logout))
        .route("/api/weather", get(api::weather))
        .route("/api/citysuggestions", get(api::city_suggestions))
        .route("/api/music", get(api::music))
        .route("/api/mapping", get(api::mapping))
        .route("/api/spotify/genres", get(api::genres))
        .route("/api/spotify/create-playlist", post(api::create_playlist))
        .route("/api/spotify/playlists/{id}/tracks", put(api::replace_playlist_tracks))
        .route("/api/chat/analyze-mood", post(api::analyze_mood))
        .route("/api/city-insights", post(api::city_insights))
        .fallback_service(assets)
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Drops expired Spotify cache entries and forgets idle rate-limit keys.
pub fn purge(state: &AppState) {
    let cached = state.spotify.purge_expired();
    let limited_clients = state.music_limiter.purge();
    debug!(cached, limited_clients, "purged caches and limiter keys");
}

async fn purge_periodically(state: AppState) {
    let mut interval = tokio::time::interval(CACHE_PURGE_INTERVAL);
    loop {
        interval.tick().await;
        purge(&state);
    }
}

pub async fn start_api_server(config: Config) -> Res<()> {
    config.require_server_secrets()?;

    let addr = SocketAddr::from_str(&config.server_addr)
        .map_err(|e| Error::Config(format!("Failed to parse server address: {e}")))?;
    let state = AppState::new(config)?;

    tokio::spawn(purge_periodically(state.clone()));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "moodmix listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
