use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{HeaderMap, HeaderName, header, request::Parts},
};
use tracing::debug;

use crate::{
    error::{Error, Res},
    management::{
        TokenManager,
        session::{SESSION_COOKIE, read_cookie, set_cookie},
    },
    server::AppState,
    types::SessionToken,
    utils,
};

/// Verified Spotify session of the caller.
///
/// Extracting it refreshes an expired access token. When that happened the
/// handler must send [`AuthSession::set_cookie`] with its response so the
/// browser keeps the new token. A failed refresh rejects the request with
/// [`Error::RefreshFailed`], whose response re-issues the session marked
/// with the refresh error.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub token: SessionToken,
    refreshed: bool,
}

impl AuthSession {
    /// Loads the session cookie and makes sure it holds a usable access token.
    ///
    /// # Errors
    ///
    /// * [`Error::Session`] for a missing, forged or expired cookie, or a
    ///   session that cannot be refreshed at all
    /// * [`Error::RefreshFailed`] when the token endpoint refused the refresh
    pub async fn from_headers(headers: &HeaderMap, state: &AppState) -> Res<Self> {
        let token = load_session(headers, state)?;

        let mut manager = TokenManager::new(token, state.config.token_refresh_skew);
        let access_token = manager.get_valid_token(&state.auth).await;
        let refreshed = manager.refreshed();
        let token = manager.into_token();

        match access_token {
            Some(access_token) => Ok(AuthSession {
                access_token,
                token,
                refreshed,
            }),
            None if refreshed => {
                let reason = token
                    .error
                    .clone()
                    .unwrap_or_else(|| "refresh failed".to_string());
                let cookie = session_cookie(state, &token)?;
                Err(Error::RefreshFailed { reason, cookie })
            }
            None => Err(Error::Session(
                token
                    .error
                    .unwrap_or_else(|| "no access token".to_string()),
            )),
        }
    }

    /// `Set-Cookie` header re-issuing the session, present only after a refresh.
    pub fn set_cookie(&self, state: &AppState) -> Option<(HeaderName, String)> {
        if !self.refreshed {
            return None;
        }
        session_cookie(state, &self.token)
            .ok()
            .map(|cookie| (header::SET_COOKIE, cookie))
    }
}

/// Decodes the session cookie and rejects sessions whose last token grant is
/// older than the max age.
pub fn load_session(headers: &HeaderMap, state: &AppState) -> Res<SessionToken> {
    let raw = read_cookie(headers, SESSION_COOKIE)
        .ok_or_else(|| Error::Session("missing session cookie".to_string()))?;
    let token: SessionToken = state
        .sessions
        .decode(raw)
        .map_err(|e| Error::Session(e.to_string()))?;

    let max_age = state.config.session_max_age.as_secs() as i64;
    if utils::now_timestamp() >= token.issued_at + max_age {
        debug!(issued_at = token.issued_at, "session expired");
        return Err(Error::Session("session expired".to_string()));
    }
    Ok(token)
}

/// Signed `Set-Cookie` value for a session.
pub fn session_cookie(state: &AppState, token: &SessionToken) -> Res<String> {
    let value = state.sessions.encode(token)?;
    Ok(set_cookie(
        SESSION_COOKIE,
        &value,
        state.config.session_max_age,
        state.config.secure_cookies(),
    ))
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        AuthSession::from_headers(&parts.headers, state).await
    }
}

impl OptionalFromRequestParts<AppState> for AuthSession {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match AuthSession::from_headers(&parts.headers, state).await {
            Ok(session) => Ok(Some(session)),
            Err(Error::Session(reason)) | Err(Error::RefreshFailed { reason, .. }) => {
                debug!(%reason, "request without usable session");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
