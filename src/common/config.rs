// src/common/config.rs
//! Deployment-time configuration read from the environment

use std::env;
use tracing::warn;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    pub google_client_id: String,
    pub google_client_secret: String,
    pub session_secret: String,
    pub pexels_api_key: Option<String>,
    pub api_url: String,
    pub public_url: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        let google_client_id = env::var("GOOGLE_CLIENT_ID").unwrap_or_default();
        let google_client_secret = env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default();

        if google_client_id.is_empty() || google_client_secret.is_empty() {
            warn!("GOOGLE_CLIENT_ID / GOOGLE_CLIENT_SECRET not set, sign-in will fail");
        }

        let session_secret = env::var("SESSION_SECRET")
            .or_else(|_| env::var("NEXTAUTH_SECRET"))
            .unwrap_or_else(|_| {
                warn!("SESSION_SECRET not set, using an insecure development secret");
                "replace_with_strong_secret".to_string()
            });

        let pexels_api_key = env::var("PEXELS_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let api_url = env::var("POSTLY_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let public_url = env::var("PUBLIC_URL")
            .unwrap_or_else(|_| DEFAULT_PUBLIC_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            google_client_id,
            google_client_secret,
            session_secret,
            pexels_api_key,
            api_url,
            public_url,
            port,
        }
    }

    /// Redirect URI registered with the identity provider
    pub fn google_redirect_uri(&self) -> String {
        format!("{}/auth/callback/google", self.public_url)
    }

    /// Session cookies are only marked `Secure` when served over https
    pub fn secure_cookies(&self) -> bool {
        self.public_url.starts_with("https://")
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests(api_url: &str) -> Self {
        Self {
            google_client_id: "test-client-id".to_string(),
            google_client_secret: "test-client-secret".to_string(),
            session_secret: "test-session-secret".to_string(),
            pexels_api_key: Some("test-pexels-key".to_string()),
            api_url: api_url.trim_end_matches('/').to_string(),
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            port: DEFAULT_PORT,
        }
    }
}
