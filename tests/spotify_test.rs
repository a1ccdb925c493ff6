use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use moodmix::error::Error;
use moodmix::mapping::{AudioFeatures, Source};
use moodmix::spotify::{
    SpotifyClient, backoff, is_retryable,
    recommendations::{DEFAULT_ARTIST_SEED, RecommendationParams},
    playlist::profile_cache_key,
    search::discover_tracks,
};
use serde_json::{Value, json};

#[derive(Default)]
struct Upstream {
    hits: AtomicUsize,
    failures_left: AtomicUsize,
    queries: Mutex<Vec<String>>,
    playlist_calls: Mutex<Vec<(Method, usize)>>,
}

fn track(id: &str, name: &str, artist: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "uri": format!("spotify:track:{id}"),
        "artists": [{ "name": artist }],
    })
}

async fn search(
    State(upstream): State<Arc<Upstream>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    let q = params.get("q").cloned().unwrap_or_default();
    upstream.queries.lock().unwrap().push(q.clone());

    let failures = upstream.failures_left.load(Ordering::SeqCst);
    if failures > 0 {
        upstream.failures_left.store(failures - 1, Ordering::SeqCst);
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({}))).into_response();
    }

    match q.as_str() {
        "unauthorized" => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "status": 401, "message": "The access token expired" } })),
        )
            .into_response(),
        "happy songs" | "happy music 2024" | "happy indie" => {
            let items: Vec<Value> = (0..10)
                .map(|i| track(&format!("t{i}"), &format!("Song {i}"), "Band"))
                .collect();
            Json(json!({ "tracks": { "items": items } })).into_response()
        }
        "indie alternative 2024" => {
            let items: Vec<Value> = (0..22)
                .map(|i| track(&format!("f{i}"), &format!("Fallback {i}"), "Other"))
                .collect();
            Json(json!({ "tracks": { "items": items } })).into_response()
        }
        _ => Json(json!({ "tracks": { "items": [] } })).into_response(),
    }
}

async fn recommendations(State(upstream): State<Arc<Upstream>>) -> Json<Value> {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "tracks": [track("r1", "Rec", "Artist")] }))
}

async fn me(State(upstream): State<Arc<Upstream>>) -> Json<Value> {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "id": "listener", "display_name": "Listener" }))
}

async fn playlist_tracks(
    State(upstream): State<Arc<Upstream>>,
    method: Method,
    Path(_id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let count = body["uris"].as_array().map(Vec::len).unwrap_or(0);
    upstream.playlist_calls.lock().unwrap().push((method, count));
    Json(json!({ "snapshot_id": "snap" }))
}

async fn spawn_upstream(upstream: Arc<Upstream>) -> String {
    let app = Router::new()
        .route("/search", get(search))
        .route("/recommendations", get(recommendations))
        .route("/me", get(me))
        .route(
            "/playlists/{id}/tracks",
            post(playlist_tracks).put(playlist_tracks),
        )
        .with_state(upstream);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base: &str) -> SpotifyClient {
    SpotifyClient::new(reqwest::Client::new(), base).with_retry_base(Duration::from_millis(1))
}

#[test]
fn test_query_pairs_uses_default_seed_without_seeds() {
    let params = RecommendationParams::for_genres(vec![" ".to_string(), String::new()]);
    let pairs = params.query_pairs();

    assert_eq!(pairs[0], ("limit".to_string(), "20".to_string()));
    assert_eq!(pairs[1], ("market".to_string(), "US".to_string()));
    assert!(!pairs.iter().any(|(k, _)| k == "seed_genres"));
    assert!(
        pairs
            .iter()
            .any(|(k, v)| k == "seed_artists" && v == DEFAULT_ARTIST_SEED)
    );
}

#[test]
fn test_query_pairs_with_genres_and_targets() {
    let params = RecommendationParams::for_genres(vec!["chill".to_string(), "jazz".to_string()])
        .with_audio_features(AudioFeatures {
            valence: 0.3,
            energy: 0.4,
            tempo: 90.0,
        });
    let pairs: HashMap<String, String> = params.query_pairs().into_iter().collect();

    assert_eq!(pairs["seed_genres"], "chill,jazz");
    assert!(!pairs.contains_key("seed_artists"));
    assert_eq!(pairs["target_valence"], "0.3");
    assert_eq!(pairs["target_energy"], "0.4");
    assert_eq!(pairs["target_tempo"], "90");
    assert!(!pairs.contains_key("target_danceability"));
    assert!(params.cache_key().starts_with("recommendations:limit=20&market=US"));
}

#[test]
fn test_backoff_is_capped() {
    let base = Duration::from_millis(1000);
    assert_eq!(backoff(base, 0), Duration::from_millis(1000));
    assert_eq!(backoff(base, 1), Duration::from_millis(2000));
    assert_eq!(backoff(base, 3), Duration::from_millis(8000));
    assert_eq!(backoff(base, 4), Duration::from_millis(10000));
    assert_eq!(backoff(base, 30), Duration::from_millis(10000));
}

#[test]
fn test_retryable_statuses() {
    for code in [408, 429, 500, 502, 503, 504] {
        assert!(is_retryable(StatusCode::from_u16(code).unwrap()), "{code}");
    }
    for code in [400, 401, 403, 404, 501] {
        assert!(!is_retryable(StatusCode::from_u16(code).unwrap()), "{code}");
    }
}

#[tokio::test]
async fn test_request_retries_transient_failures() {
    let upstream = Arc::new(Upstream::default());
    upstream.failures_left.store(2, Ordering::SeqCst);
    let base = spawn_upstream(upstream.clone()).await;

    let tracks = client(&base)
        .search_tracks("token", "happy songs", 20)
        .await
        .unwrap();

    assert_eq!(tracks.len(), 10);
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_request_gives_up_after_max_retries() {
    let upstream = Arc::new(Upstream::default());
    upstream.failures_left.store(10, Ordering::SeqCst);
    let base = spawn_upstream(upstream.clone()).await;

    let err = client(&base)
        .search_tracks("token", "happy songs", 20)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    // first attempt plus three retries
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_request_does_not_retry_client_errors() {
    let upstream = Arc::new(Upstream::default());
    let base = spawn_upstream(upstream.clone()).await;

    let err = client(&base)
        .search_tracks("token", "unauthorized", 20)
        .await
        .unwrap_err();

    match err {
        Error::Upstream {
            status, message, ..
        } => {
            assert_eq!(status, 401);
            assert_eq!(message, "The access token expired");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_recommendations_are_cached() {
    let upstream = Arc::new(Upstream::default());
    let base = spawn_upstream(upstream.clone()).await;
    let client = client(&base);
    let params = RecommendationParams::for_genres(vec!["pop".to_string()]);

    let first = client.recommendations("token", &params).await.unwrap();
    let second = client.recommendations("token", &params).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].id, "r1");
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_replace_tracks_chunks_large_lists() {
    let upstream = Arc::new(Upstream::default());
    let base = spawn_upstream(upstream.clone()).await;
    let uris: Vec<String> = (0..150).map(|i| format!("spotify:track:{i}")).collect();

    client(&base)
        .replace_tracks("token", "playlist-1", &uris)
        .await
        .unwrap();

    let calls = upstream.playlist_calls.lock().unwrap().clone();
    assert_eq!(calls, vec![(Method::PUT, 100), (Method::POST, 50)]);
}

#[tokio::test]
async fn test_discover_tracks_removes_duplicates() {
    let upstream = Arc::new(Upstream::default());
    let base = spawn_upstream(upstream.clone()).await;

    let tracks = discover_tracks(&client(&base), "token", "Happy", Source::Mood)
        .await
        .unwrap();

    assert_eq!(tracks.len(), 10);
    assert_eq!(tracks[0].id, "t0");
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_discover_tracks_falls_back_when_searches_are_empty() {
    let upstream = Arc::new(Upstream::default());
    let base = spawn_upstream(upstream.clone()).await;

    let tracks = discover_tracks(&client(&base), "token", "gloomy", Source::Mood)
        .await
        .unwrap();

    assert_eq!(tracks.len(), 20);
    assert_eq!(tracks[0].id, "f0");
    let queries = upstream.queries.lock().unwrap().clone();
    assert_eq!(queries.last().map(String::as_str), Some("indie alternative 2024"));
    assert_eq!(queries.len(), 4);
}

#[tokio::test]
async fn test_request_budget_is_fifty_per_minute() {
    let upstream = Arc::new(Upstream::default());
    let base = spawn_upstream(upstream.clone()).await;
    let client = client(&base);

    for _ in 0..50 {
        client.search_tracks("token", "quiet", 20).await.unwrap();
    }
    let err = client.search_tracks("token", "quiet", 20).await.unwrap_err();

    assert!(matches!(err, Error::RateLimited));
    assert_eq!(err.status(), Some(429));
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 50);
}

#[tokio::test]
async fn test_current_user_is_cached_per_token() {
    let upstream = Arc::new(Upstream::default());
    let base = spawn_upstream(upstream.clone()).await;
    let client = client(&base);

    let first = client.current_user("token-aaaaaaaaaa").await.unwrap();
    let second = client.current_user("token-aaaaaaaaaa").await.unwrap();
    assert_eq!(first.id, "listener");
    assert_eq!(second.display_name.as_deref(), Some("Listener"));
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 1);

    client.current_user("token-bbbbbbbbbb").await.unwrap();
    assert_eq!(upstream.hits.load(Ordering::SeqCst), 2);
}

#[test]
fn test_profile_cache_key_uses_last_ten_characters() {
    assert_eq!(profile_cache_key("BQDabc0123456789"), "profile:0123456789");
    assert_eq!(profile_cache_key("short"), "profile:short");
    assert_eq!(profile_cache_key(""), "profile:");

    // multi-byte characters are never split
    let token = "ä".repeat(20);
    assert_eq!(profile_cache_key(&token), format!("profile:{}", "ä".repeat(10)));
    assert_eq!(profile_cache_key("x€€€€€€€€€€"), format!("profile:{}", "€".repeat(10)));
}
