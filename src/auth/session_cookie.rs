//! Session cookie: the stored [`SessionRecord`] signed as an HS256 JWT
//!
//! Lifecycle: written after a successful exchange, re-issued with a fresh
//! expiry whenever a request reads it, removed on sign-out.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use tower_cookies::cookie::{time, SameSite};
use tower_cookies::{Cookie, Cookies};
use tracing::debug;

use super::models::{SessionClaims, SessionRecord};

pub const SESSION_COOKIE: &str = "postly_session";
pub const OAUTH_STATE_COOKIE: &str = "postly_oauth_state";

const SESSION_MAX_AGE_DAYS: i64 = 30;
const OAUTH_STATE_MAX_AGE_MINUTES: i64 = 10;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session token could not be signed: {0}")]
    Encode(String),

    #[error("session token rejected: {0}")]
    Invalid(String),
}

#[derive(Clone)]
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    max_age: Duration,
    secure: bool,
}

impl SessionCodec {
    pub fn new(secret: &str, secure: bool) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            max_age: Duration::days(SESSION_MAX_AGE_DAYS),
            secure,
        }
    }

    pub fn encode(&self, record: &SessionRecord) -> Result<String, SessionError> {
        let now = Utc::now();
        let claims = SessionClaims {
            record: record.clone(),
            iat: now.timestamp() as usize,
            exp: (now + self.max_age).timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| SessionError::Encode(e.to_string()))
    }

    pub fn decode(&self, token: &str) -> Result<SessionRecord, SessionError> {
        decode::<SessionClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims.record)
            .map_err(|e| SessionError::Invalid(e.to_string()))
    }

    /// Stored record from the request cookies; invalid or expired tokens read as absent
    pub fn read(&self, cookies: &Cookies) -> Option<SessionRecord> {
        let cookie = cookies.get(SESSION_COOKIE)?;
        match self.decode(cookie.value()) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(error = %e, "Ignoring unusable session cookie");
                None
            }
        }
    }

    pub fn write(&self, cookies: &Cookies, record: &SessionRecord) -> Result<(), SessionError> {
        let token = self.encode(record)?;
        cookies.add(self.build_cookie(
            SESSION_COOKIE,
            token,
            time::Duration::days(SESSION_MAX_AGE_DAYS),
        ));
        Ok(())
    }

    pub fn clear(&self, cookies: &Cookies) {
        cookies.remove(self.build_cookie(SESSION_COOKIE, String::new(), time::Duration::ZERO));
    }

    pub fn write_oauth_state(&self, cookies: &Cookies, state: &str) {
        cookies.add(self.build_cookie(
            OAUTH_STATE_COOKIE,
            state.to_string(),
            time::Duration::minutes(OAUTH_STATE_MAX_AGE_MINUTES),
        ));
    }

    /// Returns the pending OAuth state and removes it; it is single use
    pub fn take_oauth_state(&self, cookies: &Cookies) -> Option<String> {
        let value = cookies.get(OAUTH_STATE_COOKIE)?.value().to_string();
        cookies.remove(self.build_cookie(OAUTH_STATE_COOKIE, String::new(), time::Duration::ZERO));
        Some(value)
    }

    fn build_cookie(
        &self,
        name: &'static str,
        value: String,
        max_age: time::Duration,
    ) -> Cookie<'static> {
        let mut cookie = Cookie::new(name, value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_secure(self.secure);
        cookie.set_max_age(max_age);
        cookie
    }
}
