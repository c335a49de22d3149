// src/main.rs
use axum::{extract::Extension, middleware, Router};
use dotenv::dotenv;
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod common;
mod logging_middleware;
mod posts;
mod render;
mod services;
mod views;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use common::{AppState, Config};

/// Every page and form route behind the shared layers
pub fn build_router(state: AppState) -> Router {
    let shared = Arc::new(RwLock::new(state));

    Router::new()
        // ====================================================================
        // AUTHENTICATION ROUTES (Google sign-in, sign-out, session)
        // ====================================================================
        .merge(auth::auth_routes())
        // ====================================================================
        // POST ROUTES (Listing, Detail, Compose, Search)
        // ====================================================================
        .merge(posts::posts_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(shared))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = Config::from_env();
    info!(api_url = %config.api_url, public_url = %config.public_url, "Configuration loaded");
    if config.pexels_api_key.is_none() {
        warn!("PEXELS_API_KEY not set, cover image suggestions are disabled");
    }

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let port = config.port;
    let app_state = AppState::from_config(config)?;
    info!("Services initialized");

    let app = build_router(app_state);

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
