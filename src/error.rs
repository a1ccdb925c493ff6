//! Error type shared by the HTTP handlers, the upstream clients and the CLI.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{AppendHeaders, IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport or decoding failure. The request URL is stripped because
    /// query strings may carry API keys.
    #[error("http request failed: {0}")]
    Http(reqwest::Error),

    /// Non-success answer from an upstream service.
    #[error("{service} responded with {status}: {message}")]
    Upstream {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("invalid session: {0}")]
    Session(String),

    /// Refreshing the access token failed. `cookie` re-issues the session
    /// marked with the refresh error and without an access token.
    #[error("token refresh failed: {reason}")]
    RefreshFailed { reason: String, cookie: String },

    #[error("assistant error: {0}")]
    Assistant(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e.without_url())
    }
}

impl Error {
    pub fn upstream(service: &'static str, status: u16, message: impl Into<String>) -> Self {
        Error::Upstream {
            service,
            status,
            message: message.into(),
        }
    }

    /// Status code of the upstream answer, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            Error::RateLimited => Some(429),
            _ => None,
        }
    }

    /// Message suitable for showing to an end user of the music catalog.
    pub fn user_message(&self) -> String {
        match self.status() {
            Some(401) => "Please reconnect your Spotify account".to_string(),
            Some(403) => "Insufficient permissions for this action".to_string(),
            Some(429) => "Too many requests. Please try again later".to_string(),
            _ => match self {
                Error::Upstream { message, .. } => message.clone(),
                _ => "An unexpected error occurred".to_string(),
            },
        }
    }

    /// Description that is safe to send to a browser. Transport internals
    /// and upstream response bodies stay in the logs.
    pub fn client_details(&self) -> String {
        match self {
            Error::Http(e) if e.is_timeout() => "upstream request timed out".to_string(),
            Error::Http(_) => "upstream request failed".to_string(),
            Error::Upstream { service, status, .. } => format!("{service} responded with {status}"),
            Error::Config(_) => "service configuration error".to_string(),
            other => other.to_string(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthorized(_) | Error::Session(_) | Error::RefreshFailed { .. } => {
                StatusCode::UNAUTHORIZED
            }
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Error::Unauthorized(msg) | Error::BadRequest(msg) | Error::NotFound(msg) => {
                json!({ "error": msg })
            }
            Error::Session(_) | Error::RefreshFailed { .. } => {
                json!({ "error": "Spotify authentication required" })
            }
            Error::RateLimited => {
                json!({ "error": "Too many requests. Please try again later." })
            }
            other => json!({ "error": "Internal server error", "details": other.client_details() }),
        };
        let cookie = match self {
            Error::RefreshFailed { cookie, .. } => Some((header::SET_COOKIE, cookie)),
            _ => None,
        };
        (status, AppendHeaders(cookie), Json(body)).into_response()
    }
}

/// A convenient Result type alias for operations that may fail.
pub type Res<T> = std::result::Result<T, Error>;
