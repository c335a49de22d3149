//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET /auth/signin` - Sign-in page
/// - `GET /auth/signin/google` - Start Google OAuth
/// - `GET /auth/callback/google` - OAuth callback, runs the session pipeline
/// - `POST /auth/signout` - Clear the session cookie
/// - `GET /auth/error` - Sign-in error page
/// - `GET /auth/session` - Current session as JSON
/// - `GET /auth/check` - Verify the access token against the API
pub fn auth_routes() -> Router {
    Router::new()
        .route("/auth/signin", get(handlers::signin_page))
        .route("/auth/signin/google", get(handlers::google_signin))
        .route("/auth/callback/google", get(handlers::google_callback))
        .route("/auth/signout", post(handlers::signout))
        .route("/auth/error", get(handlers::auth_error))
        .route("/auth/session", get(handlers::session_json))
        .route("/auth/check", get(handlers::check_session))
}
