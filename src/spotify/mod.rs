//! # Spotify Integration Module
//!
//! Client for the parts of the Spotify Web API moodmix uses: track search,
//! seed-based recommendations, genre seeds, the current user's profile and
//! playlist writes. OAuth lives in [`auth`].
//!
//! ## Request behaviour
//!
//! Every call goes through [`SpotifyClient::request`]:
//! - bearer authentication with the caller's access token
//! - a 10 second timeout per attempt
//! - a client-side budget of 50 requests per minute
//! - up to 3 retries on 408/429/500/502/503/504, waiting `Retry-After`
//!   seconds when the server sends it (up to 120) and otherwise
//!   `min(1s * 2^attempt, 10s)`
//!
//! Recommendations and profiles are cached for five minutes, genre seeds
//! for two hours.

pub mod auth;
pub mod playlist;
pub mod recommendations;
pub mod search;

use std::time::Duration;

use governor::{DefaultDirectRateLimiter, RateLimiter};
use moka::sync::Cache;
use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{
    error::{Error, Res},
    management::quota,
    types::{Track, UserProfile},
};

pub const CACHE_DURATION: Duration = Duration::from_secs(5 * 60);
const GENRE_SEED_DURATION: Duration = Duration::from_secs(2 * 60 * 60);
const CACHE_CAPACITY: u64 = 10_000;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RETRIES: u32 = 3;
const MAX_RETRY_AFTER_SECS: u64 = 120;
const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);
const MAX_REQUESTS_PER_WINDOW: u32 = 50;

pub struct SpotifyClient {
    http: Client,
    api_url: String,
    retry_base: Duration,
    limiter: DefaultDirectRateLimiter,
    pub(crate) recommendations: Cache<String, Vec<Track>>,
    pub(crate) profiles: Cache<String, UserProfile>,
    pub(crate) genre_seeds: Cache<String, Vec<String>>,
}

impl SpotifyClient {
    /// Creates a client for the Web API rooted at `api_url`.
    ///
    /// # Arguments
    ///
    /// * `http` - Shared connection pool
    /// * `api_url` - Base URL such as `https://api.spotify.com/v1`; a trailing
    ///   slash is ignored
    pub fn new(http: Client, api_url: impl Into<String>) -> Self {
        SpotifyClient {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            retry_base: Duration::from_millis(1000),
            limiter: RateLimiter::direct(quota(MAX_REQUESTS_PER_WINDOW, RATE_LIMIT_WINDOW)),
            recommendations: ttl_cache(CACHE_DURATION),
            profiles: ttl_cache(CACHE_DURATION),
            genre_seeds: ttl_cache(GENRE_SEED_DURATION),
        }
    }

    /// Overrides the base delay of the retry backoff.
    pub fn with_retry_base(mut self, base: Duration) -> Self {
        self.retry_base = base;
        self
    }

    /// Evicts expired entries from every cache and returns how many entries
    /// remain.
    pub fn purge_expired(&self) -> u64 {
        self.recommendations.run_pending_tasks();
        self.profiles.run_pending_tasks();
        self.genre_seeds.run_pending_tasks();
        self.recommendations.entry_count()
            + self.profiles.entry_count()
            + self.genre_seeds.entry_count()
    }

    /// GET `endpoint` and decode the JSON answer.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Path below the API root (`/me`) or an absolute URL
    /// * `token` - Bearer access token
    /// * `query` - Query pairs; may be empty
    ///
    /// # Errors
    ///
    /// See [`SpotifyClient::request`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        token: &str,
        query: &[(String, String)],
    ) -> Res<T> {
        self.request::<T, Value>(Method::GET, endpoint, token, query, None)
            .await
    }

    /// Sends `body` as JSON with `method` and decodes the answer.
    pub async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        token: &str,
        body: &B,
    ) -> Res<T> {
        self.request(method, endpoint, token, &[], Some(body)).await
    }

    /// Performs one API call with bearer authentication and retries.
    ///
    /// Retryable statuses (408, 429 and the usual 5xx) are retried up to three
    /// times. A `Retry-After` header of at most 120 seconds is honoured; other
    /// waits follow [`backoff`]. Retries wait for the rate budget instead of
    /// failing on it.
    ///
    /// # Errors
    ///
    /// * [`Error::RateLimited`] when the client-side budget of 50 requests per
    ///   minute is spent before the first attempt
    /// * [`Error::Upstream`] with Spotify's `error.message` for a final
    ///   non-success answer
    /// * [`Error::Http`] for transport failures and undecodable bodies
    pub async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        token: &str,
        query: &[(String, String)],
        body: Option<&B>,
    ) -> Res<T> {
        if self.limiter.check().is_err() {
            return Err(Error::RateLimited);
        }

        let url = if endpoint.starts_with("http") {
            endpoint.to_string()
        } else {
            format!("{}{}", self.api_url, endpoint)
        };

        let mut attempt = 0;
        loop {
            let mut req = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(token)
                .timeout(DEFAULT_TIMEOUT);
            if !query.is_empty() {
                req = req.query(query);
            }
            if let Some(body) = body {
                req = req.json(body);
            }

            let response = req.send().await?;

            let status = response.status();
            if status.is_success() {
                return Ok(response.json::<T>().await?);
            }

            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body["error"]["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

            if !is_retryable(status) || attempt >= MAX_RETRIES {
                return Err(Error::upstream("Spotify", status.as_u16(), message));
            }

            let delay = self.retry_delay(attempt, retry_after);
            warn!(
                %url,
                status = status.as_u16(),
                attempt,
                delay_ms = delay.as_millis() as u64,
                "retrying spotify request"
            );
            sleep(delay).await;
            self.limiter.until_ready().await;
            attempt += 1;
        }
    }

    fn retry_delay(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        match retry_after {
            Some(secs) if secs <= MAX_RETRY_AFTER_SECS => Duration::from_secs(secs),
            Some(secs) => {
                debug!(secs, "ignoring abnormally high retry-after");
                backoff(self.retry_base, attempt)
            }
            None => backoff(self.retry_base, attempt),
        }
    }
}

fn ttl_cache<V: Clone + Send + Sync + 'static>(ttl: Duration) -> Cache<String, V> {
    Cache::builder()
        .max_capacity(CACHE_CAPACITY)
        .time_to_live(ttl)
        .build()
}

/// Statuses worth another attempt.
pub fn is_retryable(status: StatusCode) -> bool {
    matches!(status.as_u16(), 408 | 429 | 500 | 502 | 503 | 504)
}

/// `min(base * 2^attempt, 10 * base)`.
pub fn backoff(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt).min(10);
    base * factor
}
