use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::{
    error::{Error, Res},
    management::{
        TokenManager,
        session::{LOGIN_COOKIE, LOGIN_MAX_AGE, SESSION_COOKIE, clear_cookie, read_cookie, set_cookie},
    },
    server::AppState,
    types::{LoginState, SessionToken},
    utils,
};

use super::{
    json_error,
    session::{load_session, session_cookie},
};

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Starts the OAuth flow: remembers a random `state` and redirects to Spotify.
pub async fn login(
    State(state): State<AppState>,
    Query(params): Query<LoginParams>,
) -> Res<Response> {
    let login = LoginState {
        state: utils::generate_state_token(),
        city: params.city.filter(|c| !c.trim().is_empty()),
        issued_at: utils::now_timestamp(),
    };
    let url = state.auth.authorize_url(&login.state)?;
    let cookie = set_cookie(
        LOGIN_COOKIE,
        &state.sessions.encode(&login)?,
        LOGIN_MAX_AGE,
        state.config.secure_cookies(),
    );

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Redirect::to(&url),
    )
        .into_response())
}

/// Redirect target after the user approved (or declined) access.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Res<Response> {
    let secure = state.config.secure_cookies();

    if let Some(error) = params.error {
        warn!(%error, "authorization declined");
        let target = with_query("/", "error", &error);
        return Ok((
            AppendHeaders([(header::SET_COOKIE, clear_cookie(LOGIN_COOKIE, secure))]),
            Redirect::to(&target),
        )
            .into_response());
    }

    let login = read_cookie(&headers, LOGIN_COOKIE)
        .and_then(|raw| state.sessions.decode::<LoginState>(raw).ok())
        .filter(|login| utils::now_timestamp() < login.issued_at + LOGIN_MAX_AGE.as_secs() as i64);
    let Some(login) = login else {
        return Err(Error::BadRequest("Missing or expired login state".to_string()));
    };
    if params.state.as_deref() != Some(login.state.as_str()) {
        warn!("oauth state mismatch");
        return Err(Error::BadRequest("Invalid state parameter".to_string()));
    }
    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return Err(Error::BadRequest("Missing authorization code".to_string()));
    };

    let token = state.auth.exchange_code(&code).await?;
    let now = utils::now_timestamp();
    let session = SessionToken {
        access_token: Some(token.access_token),
        refresh_token: token.refresh_token,
        expires_at: Some(now + token.expires_in as i64),
        issued_at: now,
        error: None,
    };
    info!("spotify login completed");

    let target = match login.city.as_deref() {
        Some(city) => with_query("/", "city", city),
        None => "/".to_string(),
    };
    Ok((
        AppendHeaders([
            (header::SET_COOKIE, session_cookie(&state, &session)?),
            (header::SET_COOKIE, clear_cookie(LOGIN_COOKIE, secure)),
        ]),
        Redirect::to(&target),
    )
        .into_response())
}

/// Refreshes the access token right away, regardless of its expiry.
pub async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Ok(token) = load_session(&headers, &state) else {
        return json_error(StatusCode::UNAUTHORIZED, "Not authenticated");
    };
    let Some(refresh_token) = token.refresh_token.clone() else {
        return json_error(StatusCode::BAD_REQUEST, "No refresh token available");
    };

    let fresh = match state.auth.refresh_token(&refresh_token).await {
        Ok(fresh) => fresh,
        Err(e) => {
            warn!(error = %e, "token refresh failed");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to refresh token");
        }
    };

    let expires_in = fresh.expires_in;
    let mut manager = TokenManager::new(token, state.config.token_refresh_skew);
    manager.apply_refresh(fresh, utils::now_timestamp());
    let token = manager.into_token();

    let cookie = match session_cookie(&state, &token) {
        Ok(cookie) => cookie,
        Err(e) => return e.into_response(),
    };
    (
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(json!({
            "accessToken": token.access_token,
            "expiresIn": expires_in,
        })),
    )
        .into_response()
}

/// Reports whether the caller holds a usable Spotify session.
///
/// An expired access token is refreshed first, exactly as for protected
/// routes, and the re-issued cookie is sent along. A failed refresh reports
/// `authenticated: false` with `error: "RefreshAccessTokenError"`.
pub async fn session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Ok(token) = load_session(&headers, &state) else {
        return Json(json!({
            "authenticated": false,
            "expiresAt": null,
            "error": null,
        }))
        .into_response();
    };

    let mut manager = TokenManager::new(token, state.config.token_refresh_skew);
    let access_token = manager.get_valid_token(&state.auth).await;
    let cookie = if manager.refreshed() {
        session_cookie(&state, manager.current_token())
            .ok()
            .map(|cookie| (header::SET_COOKIE, cookie))
    } else {
        None
    };
    let token = manager.into_token();

    (
        AppendHeaders(cookie),
        Json(json!({
            "authenticated": access_token.is_some() && token.error.is_none(),
            "expiresAt": token.expires_at,
            "error": token.error,
        })),
    )
        .into_response()
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        AppendHeaders([(
            header::SET_COOKIE,
            clear_cookie(SESSION_COOKIE, state.config.secure_cookies()),
        )]),
        Json(json!({ "success": true })),
    )
}

fn with_query(path: &str, key: &str, value: &str) -> String {
    match Url::parse("http://localhost").and_then(|base| base.join(path)) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair(key, value);
            match url.query() {
                Some(query) => format!("{}?{}", url.path(), query),
                None => url.path().to_string(),
            }
        }
        Err(_) => path.to_string(),
    }
}
