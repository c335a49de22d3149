//! Authentication data models

use serde::{Deserialize, Serialize};

/// One-time identity token issued by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAssertion(String);

impl IdentityAssertion {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// Profile reported by the identity provider alongside the assertion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Legacy field name used by Google's userinfo endpoint
    #[serde(default)]
    pub picture: Option<String>,
}

impl IdentityProfile {
    /// Provider image, preferring the primary field over the legacy one
    pub fn provider_image(&self) -> Option<&str> {
        non_empty(self.image.as_deref()).or_else(|| non_empty(self.picture.as_deref()))
    }
}

/// Payload delivered to the pipeline when the identity provider redirects back
#[derive(Debug, Clone, Default)]
pub struct ProviderCallback {
    pub assertion: Option<IdentityAssertion>,
    pub profile: Option<IdentityProfile>,
}

impl ProviderCallback {
    /// Only a fresh sign-in carries a usable assertion
    pub fn fresh_assertion(&self) -> Option<&IdentityAssertion> {
        self.assertion.as_ref().filter(|a| !a.is_empty())
    }
}

/// User profile returned by the Postly API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Token exchange response from `POST /api/auth/login`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: ApiUser,
}

/// Fields persisted for one browser session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ApiUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_image: Option<String>,
}

impl SessionRecord {
    pub fn has_access_token(&self) -> bool {
        self.access_token
            .as_deref()
            .map_or(false, |token| !token.is_empty())
    }
}

/// User as exposed to views; `image` is always populated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub profile_picture: Option<String>,
    pub image: String,
}

/// Materialized session handed to every view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub user: Option<SessionUser>,
}

impl Session {
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.user_id.as_str())
    }

    pub fn display_name(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.name.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or("Postly user")
    }
}

/// JWT claims carried by the session cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(flatten)]
    pub record: SessionRecord,
    pub iat: usize,
    pub exp: usize,
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
