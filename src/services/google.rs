// src/services/google.rs
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::auth::models::IdentityProfile;
use crate::common::helpers::safe_email_log;

pub const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

const SCOPES: [&str; 3] = ["openid", "email", "profile"];

#[derive(Debug, Error)]
pub enum GoogleError {
    #[error("Google OAuth not configured")]
    NotConfigured,

    #[error("OAuth flow failed: {0}")]
    OAuthFailed(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl GoogleError {
    /// Short code passed to the sign-in error page
    pub fn code(&self) -> &'static str {
        match self {
            GoogleError::NotConfigured => "Configuration",
            GoogleError::OAuthFailed(_) => "OAuthCallback",
            GoogleError::RequestFailed(_) | GoogleError::SerializationError(_) => "OAuthCallback",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub authorize: String,
    pub token: String,
    pub userinfo: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            authorize: GOOGLE_AUTHORIZE_URL.to_string(),
            token: GOOGLE_TOKEN_URL.to_string(),
            userinfo: GOOGLE_USERINFO_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoogleService {
    client: Client,
    client_id: String,
    client_secret: String,
    endpoints: GoogleEndpoints,
}

impl GoogleService {
    pub fn new(client: Client, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self::with_endpoints(client, client_id, client_secret, GoogleEndpoints::default())
    }

    pub fn with_endpoints(
        client: Client,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        endpoints: GoogleEndpoints,
    ) -> Self {
        Self {
            client,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            endpoints,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// Get authorization URL for the sign-in flow
    ///
    /// Requests offline access and always shows the account chooser.
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<String, GoogleError> {
        if !self.is_configured() {
            return Err(GoogleError::NotConfigured);
        }

        let scope_param = SCOPES.join(" ");
        let auth_url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=select_account&state={}",
            self.endpoints.authorize,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&scope_param),
            urlencoding::encode(state),
        );

        debug!("Generated Google OAuth authorization URL with scopes: {}", scope_param);
        Ok(auth_url)
    }

    /// Exchange authorization code for tokens
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, GoogleError> {
        if !self.is_configured() {
            return Err(GoogleError::NotConfigured);
        }

        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        debug!("Exchanging authorization code for tokens");

        let response = self
            .client
            .post(&self.endpoints.token)
            .form(&params)
            .send()
            .await
            .map_err(|e| GoogleError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Token exchange failed");
            return Err(GoogleError::OAuthFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let token_response = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| GoogleError::SerializationError(e.to_string()))?;

        info!(
            has_id_token = token_response.id_token.is_some(),
            "Successfully exchanged authorization code for tokens"
        );
        Ok(token_response)
    }

    /// Get the signed-in user's profile from the provider access token
    pub async fn fetch_profile(&self, access_token: &str) -> Result<IdentityProfile, GoogleError> {
        let response = self
            .client
            .get(&self.endpoints.userinfo)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| GoogleError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GoogleError::RequestFailed(format!(
                "Failed to get user info: HTTP {}",
                response.status()
            )));
        }

        let profile = response
            .json::<IdentityProfile>()
            .await
            .map_err(|e| GoogleError::SerializationError(e.to_string()))?;

        debug!(
            email = %profile.email.as_deref().map(safe_email_log).unwrap_or_default(),
            has_picture = profile.provider_image().is_some(),
            "Fetched Google profile"
        );
        Ok(profile)
    }
}
