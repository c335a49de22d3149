//! Session extractors for Axum
//!
//! Both extractors decode the session cookie, re-issue it with a fresh expiry
//! and hand the handler the materialized [`Session`].

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::request::Parts,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_cookies::Cookies;
use tracing::{debug, warn};

use super::models::Session;
use super::pipeline::materialize;
use crate::common::{AppError, AppState};

/// Signed-in session; requests without one are redirected home
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

/// Session if the visitor is signed in
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

async fn session_from_parts<S>(parts: &mut Parts, state: &S) -> Result<Option<Session>, AppError>
where
    S: Send + Sync,
{
    // Extract the Extension containing the AppState
    let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
        Extension::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::InternalServer("missing app state".to_string()))?;

    let cookies = Cookies::from_request_parts(parts, state)
        .await
        .map_err(|(_, msg)| AppError::InternalServer(msg.to_string()))?;

    let app_state = state_lock.read().await;
    let Some(record) = app_state.sessions.read(&cookies) else {
        return Ok(None);
    };

    // Passive refresh: only the expiry moves, stored fields are kept as is
    if let Err(e) = app_state.sessions.write(&cookies, &record) {
        warn!(error = %e, "Failed to refresh session cookie");
    }

    let session = materialize(&record);
    if let Some(user_id) = session.as_ref().and_then(|s| s.user_id()) {
        debug!(user_id = %user_id, "Session resolved from cookie");
    }
    Ok(session)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match session_from_parts(parts, state).await? {
            Some(session) => Ok(CurrentSession(session)),
            None => {
                debug!(path = %parts.uri.path(), "No session, redirecting home");
                Err(AppError::SignInRequired)
            }
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        session_from_parts(parts, state).await.map(MaybeSession)
    }
}
