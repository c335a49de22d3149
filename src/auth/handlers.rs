//! Authentication handlers
//!
//! Google authorization-code flow in front of the session pipeline, plus
//! sign-out and a JSON view of the current session.

use axum::{
    extract::{Extension, Json, Query},
    response::Redirect,
};
use maud::Markup;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_cookies::Cookies;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::extractors::{CurrentSession, MaybeSession};
use super::models::{ApiUser, IdentityAssertion, ProviderCallback, Session};
use super::pipeline::SignInOutcome;
use crate::common::{AppError, AppState};
use crate::render;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorParams {
    pub error: Option<String>,
}

fn error_redirect(code: &str) -> Redirect {
    Redirect::to(&format!("/auth/error?error={}", urlencoding::encode(code)))
}

/// GET /auth/signin
pub async fn signin_page(Extension(state_lock): Extension<Arc<RwLock<AppState>>>) -> Markup {
    let state = state_lock.read().await;
    render::auth::signin_page(state.google_service.is_configured())
}

/// GET /auth/signin/google - Start the OAuth flow
pub async fn google_signin(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    cookies: Cookies,
) -> Redirect {
    let state = state_lock.read().await;

    let nonce = Uuid::new_v4().to_string();
    let redirect_uri = state.config.google_redirect_uri();

    match state.google_service.authorization_url(&redirect_uri, &nonce) {
        Ok(auth_url) => {
            state.sessions.write_oauth_state(&cookies, &nonce);
            info!(redirect_uri = %redirect_uri, "Redirecting to Google sign-in");
            Redirect::to(&auth_url)
        }
        Err(e) => {
            error!(error = %e, "Failed to generate Google OAuth URL");
            error_redirect(e.code())
        }
    }
}

/// GET /auth/callback/google - Handle OAuth callback from Google
///
/// Provider failures land on the sign-in error page. A failed exchange with
/// the Postly API does not: the visitor goes home with the session they had.
pub async fn google_callback(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    cookies: Cookies,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    let state = state_lock.read().await.clone();

    // Check for error from Google
    if let Some(oauth_error) = params.error.as_deref() {
        warn!(oauth_error = %oauth_error, "Google OAuth returned error");
        let code = if oauth_error == "access_denied" {
            "AccessDenied"
        } else {
            "OAuthCallback"
        };
        return error_redirect(code);
    }

    let expected = state.sessions.take_oauth_state(&cookies);
    if expected.is_none() || expected != params.state {
        warn!("OAuth state missing or mismatched");
        return error_redirect("OAuthState");
    }

    let Some(code) = params.code.as_deref().filter(|c| !c.is_empty()) else {
        error!("No authorization code in OAuth callback");
        return error_redirect("OAuthCallback");
    };

    let redirect_uri = state.config.google_redirect_uri();
    let tokens = match state.google_service.exchange_code(code, &redirect_uri).await {
        Ok(tokens) => tokens,
        Err(e) => {
            error!(error = %e, "Failed to exchange authorization code for tokens");
            return error_redirect(e.code());
        }
    };

    let profile = match state.google_service.fetch_profile(&tokens.access_token).await {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!(error = %e, "Could not read Google profile, continuing without it");
            None
        }
    };

    let callback = ProviderCallback {
        assertion: tokens.id_token.map(IdentityAssertion::new),
        profile,
    };

    let previous = state.sessions.read(&cookies).unwrap_or_default();
    let (record, outcome) = state.pipeline.on_callback(previous, &callback).await;

    if record.has_access_token() {
        if let Err(e) = state.sessions.write(&cookies, &record) {
            error!(error = %e, "Failed to write session cookie");
        }
    }

    debug!(outcome = ?outcome, "Sign-in callback handled");
    if outcome == SignInOutcome::Upgraded {
        info!("User signed in");
    }
    Redirect::to("/")
}

/// POST /auth/signout
pub async fn signout(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    cookies: Cookies,
    MaybeSession(session): MaybeSession,
) -> Redirect {
    let state = state_lock.read().await.clone();

    if let Some(user_id) = session.as_ref().and_then(|s| s.user_id()) {
        if state.drafts.remove(user_id).await {
            debug!(user_id = %user_id, "Draft discarded on sign-out");
        }
        info!(user_id = %user_id, "User signed out");
    }

    state.sessions.clear(&cookies);
    Redirect::to("/")
}

/// GET /auth/error
pub async fn auth_error(Query(params): Query<ErrorParams>) -> Markup {
    render::auth::error_page(params.error.as_deref().unwrap_or_default())
}

/// GET /auth/check - Confirms the access token with the API and returns its user
pub async fn check_session(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<ApiUser>, AppError> {
    let auth = state_lock.read().await.auth.clone();
    let user = auth.check_auth(&session.access_token).await.map_err(|e| {
        warn!(error = %e, "Access token check failed");
        AppError::Upstream(e.to_string())
    })?;
    Ok(Json(user))
}

/// GET /auth/session - The materialized session, `null` when signed out
pub async fn session_json(MaybeSession(session): MaybeSession) -> Json<Option<Session>> {
    Json(session)
}
