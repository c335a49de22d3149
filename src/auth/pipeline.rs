//! Session augmentation pipeline
//!
//! Turns a one-time identity assertion into an application session:
//!
//! 1. exchange the assertion with the Postly API for `{accessToken, user}`
//! 2. stash the provider's profile image next to the exchanged user
//! 3. materialize the visible [`Session`] from the stored record on every read
//!
//! A failed exchange never surfaces as an error. The previous record is
//! returned untouched so the identity provider's own login flow keeps working.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::models::{
    non_empty, AuthResponse, IdentityAssertion, ProviderCallback, Session, SessionRecord,
    SessionUser,
};
use crate::common::helpers::{safe_email_log, safe_token_log};
use crate::services::api::ApiClientError;

/// Exchanges an identity assertion for an application session token
#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn exchange(&self, assertion: &IdentityAssertion) -> Result<AuthResponse, ApiClientError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Exchanging,
    Authenticated,
}

impl AuthState {
    pub fn of(record: &SessionRecord) -> Self {
        if record.has_access_token() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthState::Unauthenticated => "unauthenticated",
            AuthState::Exchanging => "exchanging",
            AuthState::Authenticated => "authenticated",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInOutcome {
    /// No fresh assertion, stored fields passed through
    Unchanged,
    /// Exchange succeeded and the record now carries a new access token
    Upgraded,
    /// Exchange failed, previous record kept as is
    Failed,
}

#[derive(Clone)]
pub struct SessionPipeline {
    exchange: Arc<dyn TokenExchange>,
}

impl SessionPipeline {
    pub fn new(exchange: Arc<dyn TokenExchange>) -> Self {
        Self { exchange }
    }

    /// Runs the exchange for a provider callback and returns the record to store
    pub async fn on_callback(
        &self,
        previous: SessionRecord,
        callback: &ProviderCallback,
    ) -> (SessionRecord, SignInOutcome) {
        let Some(assertion) = callback.fresh_assertion() else {
            debug!("No fresh identity assertion, session fields passed through");
            return (previous, SignInOutcome::Unchanged);
        };

        let from = AuthState::of(&previous);
        debug!(from = %from, to = %AuthState::Exchanging, "Session state transition");

        match self.exchange.exchange(assertion).await {
            Ok(response) => {
                // A new sign-in replaces the stored record, never patches it
                let record = SessionRecord {
                    access_token: Some(response.access_token),
                    user: Some(response.user),
                    user_image: callback
                        .profile
                        .as_ref()
                        .and_then(|profile| profile.provider_image())
                        .map(str::to_string),
                };

                let user = record.user.as_ref();
                info!(
                    user_id = %user.map(|u| u.user_id.as_str()).unwrap_or("unknown"),
                    email = %user
                        .and_then(|u| u.email.as_deref())
                        .map(safe_email_log)
                        .unwrap_or_default(),
                    access_token = %record
                        .access_token
                        .as_deref()
                        .map(safe_token_log)
                        .unwrap_or_default(),
                    "Identity assertion exchanged for application session"
                );
                debug!(from = %AuthState::Exchanging, to = %AuthState::Authenticated, "Session state transition");

                (record, SignInOutcome::Upgraded)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "Error during authentication with API, session not upgraded"
                );
                debug!(from = %AuthState::Exchanging, to = %from, "Session state transition");
                (previous, SignInOutcome::Failed)
            }
        }
    }
}

/// Builds the visible session from stored fields. Pure: the same record
/// always yields the same session.
pub fn materialize(record: &SessionRecord) -> Option<Session> {
    let access_token = record
        .access_token
        .as_deref()
        .filter(|token| !token.is_empty())?
        .to_string();

    let user = record.user.as_ref().map(|api_user| SessionUser {
        user_id: api_user.user_id.clone(),
        name: api_user.name.clone(),
        email: api_user.email.clone(),
        profile_picture: api_user.profile_picture.clone(),
        image: resolve_image(
            api_user.image.as_deref(),
            api_user.profile_picture.as_deref(),
            record.user_image.as_deref(),
        ),
    });

    Some(Session { access_token, user })
}

/// Existing image, then API profile picture, then provider image, then ""
pub fn resolve_image(
    existing: Option<&str>,
    api_picture: Option<&str>,
    provider_image: Option<&str>,
) -> String {
    non_empty(existing)
        .or_else(|| non_empty(api_picture))
        .or_else(|| non_empty(provider_image))
        .unwrap_or_default()
        .to_string()
}
