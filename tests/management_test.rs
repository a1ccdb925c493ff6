use std::{thread, time::Duration};

use axum::http::{HeaderMap, HeaderValue, header};
use moodmix::management::session::*;
use moodmix::management::{ClientLimiter, REFRESH_ERROR, SessionCodec, TokenManager, quota};
use moodmix::types::{LoginState, SessionToken, Token};

const SECRET: &str = "0123456789abcdef0123456789abcdef";

fn session_token(expires_at: Option<i64>) -> SessionToken {
    SessionToken {
        access_token: Some("access".to_string()),
        refresh_token: Some("refresh".to_string()),
        expires_at,
        issued_at: 1_000,
        error: None,
    }
}

fn fresh_token(refresh_token: Option<&str>) -> Token {
    Token {
        access_token: "new-access".to_string(),
        token_type: "Bearer".to_string(),
        scope: String::new(),
        expires_in: 3600,
        refresh_token: refresh_token.map(str::to_string),
    }
}

#[test]
fn test_session_codec_roundtrip_and_format() {
    let codec = SessionCodec::new(SECRET);
    let token = session_token(Some(5_000));

    let encoded = codec.encode(&token).unwrap();
    assert_eq!(encoded.matches('.').count(), 1);
    assert!(!encoded.contains('='));

    let decoded: SessionToken = codec.decode(&encoded).unwrap();
    assert_eq!(decoded, token);
}

#[test]
fn test_session_codec_rejects_tampering() {
    let codec = SessionCodec::new(SECRET);
    let login = LoginState {
        state: "abc".to_string(),
        city: Some("Austin".to_string()),
        issued_at: 1,
    };
    let encoded = codec.encode(&login).unwrap();
    let (payload, signature) = encoded.split_once('.').unwrap();

    // payload swapped for a different, validly encoded one
    let other = codec
        .encode(&LoginState {
            state: "evil".to_string(),
            city: None,
            issued_at: 1,
        })
        .unwrap();
    let (other_payload, _) = other.split_once('.').unwrap();
    let forged = format!("{other_payload}.{signature}");
    assert!(codec.decode::<LoginState>(&forged).is_err());

    // signed with a different secret
    let foreign = SessionCodec::new("another-secret-another-secret-xx");
    assert!(foreign.decode::<LoginState>(&encoded).is_err());

    assert!(codec.decode::<LoginState>(payload).is_err());
    assert!(codec.decode::<LoginState>("not a cookie").is_err());
}

#[test]
fn test_read_cookie() {
    let mut headers = HeaderMap::new();
    headers.append(
        header::COOKIE,
        HeaderValue::from_static("theme=dark; moodmix_session=abc.def"),
    );
    headers.append(header::COOKIE, HeaderValue::from_static("moodmix_login=xyz"));

    assert_eq!(read_cookie(&headers, SESSION_COOKIE), Some("abc.def"));
    assert_eq!(read_cookie(&headers, LOGIN_COOKIE), Some("xyz"));
    assert_eq!(read_cookie(&headers, "missing"), None);
}

#[test]
fn test_set_and_clear_cookie() {
    let cookie = set_cookie(SESSION_COOKIE, "v.s", Duration::from_secs(3600), false);
    assert_eq!(
        cookie,
        "moodmix_session=v.s; Path=/; HttpOnly; SameSite=Lax; Max-Age=3600"
    );

    let secure = set_cookie(SESSION_COOKIE, "v.s", Duration::from_secs(60), true);
    assert!(secure.ends_with("; Secure"));

    let cleared = clear_cookie(LOGIN_COOKIE, false);
    assert!(cleared.starts_with("moodmix_login=;"));
    assert!(cleared.contains("Max-Age=0"));
}

#[test]
fn test_token_manager_expiry_with_skew() {
    let manager = TokenManager::new(session_token(Some(1_000)), Duration::from_secs(5));

    assert!(!manager.is_expired_at(994));
    assert!(manager.is_expired_at(995));
    assert!(manager.is_expired_at(2_000));
}

#[test]
fn test_token_manager_without_access_token_is_expired() {
    let mut token = session_token(Some(i64::MAX / 2));
    token.access_token = None;
    let manager = TokenManager::new(token, Duration::from_secs(5));
    assert!(manager.is_expired_at(0));

    let manager = TokenManager::new(session_token(None), Duration::from_secs(5));
    assert!(manager.is_expired_at(0));
}

#[test]
fn test_token_manager_apply_refresh_keeps_refresh_token() {
    let mut manager = TokenManager::new(session_token(Some(1_000)), Duration::from_secs(5));
    assert!(!manager.refreshed());

    manager.apply_refresh(fresh_token(None), 2_000);
    let token = manager.current_token();
    assert_eq!(token.access_token.as_deref(), Some("new-access"));
    assert_eq!(token.refresh_token.as_deref(), Some("refresh"));
    assert_eq!(token.expires_at, Some(5_600));
    // the grant restarts the session's max age
    assert_eq!(token.issued_at, 2_000);
    assert!(manager.refreshed());

    manager.apply_refresh(fresh_token(Some("rotated")), 2_000);
    assert_eq!(
        manager.into_token().refresh_token.as_deref(),
        Some("rotated")
    );
}

#[test]
fn test_token_manager_mark_refresh_failed() {
    let mut manager = TokenManager::new(session_token(Some(1_000)), Duration::from_secs(5));
    manager.mark_refresh_failed();

    let token = manager.into_token();
    assert_eq!(token.access_token, None);
    assert_eq!(token.error.as_deref(), Some(REFRESH_ERROR));
    assert_eq!(token.refresh_token.as_deref(), Some("refresh"));
}

#[test]
fn test_quota_spreads_limit_over_window() {
    let per_minute = quota(50, Duration::from_secs(60));
    assert_eq!(per_minute.burst_size().get(), 50);
    assert_eq!(per_minute.replenish_interval(), Duration::from_millis(1200));

    let zero = quota(0, Duration::from_secs(60));
    assert_eq!(zero.burst_size().get(), 1);
}

#[test]
fn test_client_limiter_budget_per_key() {
    let limiter = ClientLimiter::new(2, Duration::from_secs(60));

    assert!(limiter.check("client"));
    assert!(limiter.check("client"));
    assert!(!limiter.check("client"));

    // other keys have their own budget
    assert!(limiter.check("other"));
    assert_eq!(limiter.len(), 2);
}

#[test]
fn test_client_limiter_purge_forgets_idle_keys() {
    let limiter = ClientLimiter::new(1, Duration::from_millis(20));
    for i in 0..100 {
        assert!(limiter.check(&format!("10.0.0.{i}")));
    }
    assert_eq!(limiter.len(), 100);

    thread::sleep(Duration::from_millis(80));
    assert_eq!(limiter.purge(), 0);
    assert!(limiter.is_empty());

    // a forgotten key starts over with a full budget
    assert!(limiter.check("10.0.0.1"));
}

#[test]
fn test_client_limiter_purge_keeps_busy_keys() {
    let limiter = ClientLimiter::new(1, Duration::from_secs(60));
    assert!(limiter.check("busy"));

    assert_eq!(limiter.purge(), 1);
    assert!(!limiter.check("busy"));
}
