//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Google OAuth sign-in
//! - The session pipeline that exchanges the Google ID token with the Postly API
//! - The signed session cookie
//! - CurrentSession / MaybeSession extractors for pages

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod session_cookie;


pub use extractors::{CurrentSession, MaybeSession};
pub use routes::auth_routes;
