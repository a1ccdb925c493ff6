//! Signed cookies.
//!
//! A cookie value is `base64url(json) "." base64url(hmac_sha256(json))`. The
//! payload is readable by the client but cannot be altered without the server
//! secret.

use std::time::Duration;

use axum::http::{HeaderMap, header};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::{Serialize, de::DeserializeOwned};
use sha2::Sha256;

use crate::error::{Error, Res};

pub const SESSION_COOKIE: &str = "moodmix_session";
pub const LOGIN_COOKIE: &str = "moodmix_login";

/// Lifetime of the login cookie that carries the OAuth `state`.
pub const LOGIN_MAX_AGE: Duration = Duration::from_secs(600);

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct SessionCodec {
    key: Vec<u8>,
}

impl SessionCodec {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        SessionCodec {
            key: secret.as_ref().to_vec(),
        }
    }

    /// Serializes `value` and signs it: `base64url(json) "." base64url(mac)`.
    pub fn encode<T: Serialize>(&self, value: &T) -> Res<String> {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(value)?);
        let signature = URL_SAFE_NO_PAD.encode(self.mac(payload.as_bytes())?.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    /// Verifies and deserializes a value produced by [`SessionCodec::encode`].
    ///
    /// # Errors
    ///
    /// [`Error::Session`] for malformed input, a signature that does not
    /// match, or a payload that is not a `T`.
    pub fn decode<T: DeserializeOwned>(&self, raw: &str) -> Res<T> {
        let (payload, signature) = raw
            .split_once('.')
            .ok_or_else(|| Error::Session("malformed cookie".to_string()))?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| Error::Session("malformed signature".to_string()))?;

        // verify_slice compares in constant time
        self.mac(payload.as_bytes())?
            .verify_slice(&signature)
            .map_err(|_| Error::Session("bad signature".to_string()))?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| Error::Session("malformed payload".to_string()))?;
        Ok(serde_json::from_slice(&json)?)
    }

    fn mac(&self, data: &[u8]) -> Res<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| Error::Session(e.to_string()))?;
        mac.update(data);
        Ok(mac)
    }
}

/// Value of the named cookie from the request's `Cookie` headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

/// `Set-Cookie` value for an `HttpOnly`, `SameSite=Lax` cookie on `/`.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use moodmix::management::session::set_cookie;
///
/// assert_eq!(
///     set_cookie("a", "b", Duration::from_secs(60), true),
///     "a=b; Path=/; HttpOnly; SameSite=Lax; Max-Age=60; Secure"
/// );
/// ```
pub fn set_cookie(name: &str, value: &str, max_age: Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        max_age.as_secs()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Expires the named cookie right away.
pub fn clear_cookie(name: &str, secure: bool) -> String {
    set_cookie(name, "", Duration::ZERO, secure)
}
