// src/services/pexels.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, warn};

pub const PEXELS_SEARCH_URL: &str = "https://api.pexels.com/v1/search";

#[derive(Debug, Error)]
pub enum PexelsError {
    #[error("Pexels API key not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Pexels returned HTTP {0}")]
    Status(u16),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Pexels serves photographer ids as numbers, older payloads as strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhotographerId {
    Number(u64),
    Text(String),
}

impl fmt::Display for PhotographerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotographerId::Number(id) => write!(f, "{}", id),
            PhotographerId::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoSources {
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub large2x: String,
    #[serde(default)]
    pub large: String,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub small: String,
    #[serde(default)]
    pub portrait: String,
    #[serde(default)]
    pub landscape: String,
    #[serde(default)]
    pub tiny: String,
}

/// Credit line shown next to a Pexels image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    #[serde(rename = "photographer")]
    pub name: String,
    #[serde(rename = "photographer_url", default)]
    pub profile_url: Option<String>,
    #[serde(rename = "photographer_id", default)]
    pub id: Option<PhotographerId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PexelsPhoto {
    pub id: u64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    /// Photo page on pexels.com
    #[serde(default)]
    pub url: String,
    #[serde(flatten)]
    pub attribution: Option<Attribution>,
    #[serde(default)]
    pub avg_color: Option<String>,
    #[serde(default)]
    pub src: PhotoSources,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub alt: Option<String>,
}

impl PexelsPhoto {
    /// Alt text for an `<img>`; never empty
    pub fn alt_text(&self) -> &str {
        self.alt
            .as_deref()
            .filter(|alt| !alt.trim().is_empty())
            .unwrap_or("Pexels image")
    }

    /// Source used as a post cover image
    pub fn cover_url(&self) -> &str {
        &self.src.large
    }

    pub fn thumbnail_url(&self) -> &str {
        if self.src.medium.is_empty() {
            &self.src.small
        } else {
            &self.src.medium
        }
    }

    pub fn photographer(&self) -> &str {
        self.attribution
            .as_ref()
            .map(|a| a.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("Unknown photographer")
    }

    /// Placeholder color while the image loads
    pub fn placeholder_color(&self) -> &str {
        self.avg_color
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or("#e5e7eb")
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

/// Free-text image search used for cover suggestions
#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn search(&self, query: &str, per_page: u32) -> Result<Vec<PexelsPhoto>, PexelsError>;
}

#[derive(Debug, Clone)]
pub struct PexelsService {
    client: Client,
    api_key: Option<String>,
    search_url: String,
}

impl PexelsService {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self::with_search_url(client, api_key, PEXELS_SEARCH_URL)
    }

    pub fn with_search_url(
        client: Client,
        api_key: Option<String>,
        search_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            search_url: search_url.into(),
        }
    }
}

#[async_trait]
impl ImageSearch for PexelsService {
    async fn search(&self, query: &str, per_page: u32) -> Result<Vec<PexelsPhoto>, PexelsError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let api_key = self.api_key.as_deref().ok_or(PexelsError::NotConfigured)?;

        debug!(query = %query, per_page = per_page, "Searching Pexels images");

        let response = self
            .client
            .get(&self.search_url)
            .header(reqwest::header::AUTHORIZATION, api_key)
            .query(&[("query", query.to_string()), ("per_page", per_page.to_string())])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Pexels request failed");
                PexelsError::RequestFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, query = %query, "Pexels search returned error status");
            return Err(PexelsError::Status(status.as_u16()));
        }

        let body = response
            .json::<SearchResponse>()
            .await
            .map_err(|e| PexelsError::SerializationError(e.to_string()))?;

        debug!(count = body.photos.len(), "Pexels search completed");
        Ok(body.photos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn photo_json(id: u64, alt: serde_json::Value, avg_color: serde_json::Value) -> serde_json::Value {
        json!({
            "id": id,
            "width": 4000,
            "height": 3000,
            "url": format!("https://www.pexels.com/photo/{}/", id),
            "photographer": "Jane Doe",
            "photographer_url": "https://www.pexels.com/@jane",
            "photographer_id": 42,
            "avg_color": avg_color,
            "src": {
                "original": format!("https://images.pexels.com/photos/{}/original.jpeg", id),
                "large2x": format!("https://images.pexels.com/photos/{}/large2x.jpeg", id),
                "large": format!("https://images.pexels.com/photos/{}/large.jpeg", id),
                "medium": format!("https://images.pexels.com/photos/{}/medium.jpeg", id),
                "small": format!("https://images.pexels.com/photos/{}/small.jpeg", id),
                "portrait": format!("https://images.pexels.com/photos/{}/portrait.jpeg", id),
                "landscape": format!("https://images.pexels.com/photos/{}/landscape.jpeg", id),
                "tiny": format!("https://images.pexels.com/photos/{}/tiny.jpeg", id)
            },
            "liked": false,
            "alt": alt
        })
    }

    #[test]
    fn test_nullable_fields_fall_back() {
        let photo: PexelsPhoto =
            serde_json::from_value(photo_json(1, json!(null), json!(null))).unwrap();
        assert_eq!(photo.alt, None);
        assert_eq!(photo.alt_text(), "Pexels image");
        assert_eq!(photo.placeholder_color(), "#e5e7eb");
        assert_eq!(photo.photographer(), "Jane Doe");
        assert_eq!(
            photo.attribution.as_ref().and_then(|a| a.id.clone()),
            Some(PhotographerId::Number(42))
        );
    }

    #[test]
    fn test_string_photographer_id_and_alt() {
        let mut raw = photo_json(2, json!("Mountain lake"), json!("#334455"));
        raw["photographer_id"] = json!("abc");
        let photo: PexelsPhoto = serde_json::from_value(raw).unwrap();
        assert_eq!(photo.alt_text(), "Mountain lake");
        assert_eq!(photo.placeholder_color(), "#334455");
        assert_eq!(
            photo.attribution.and_then(|a| a.id).map(|id| id.to_string()),
            Some("abc".to_string())
        );
    }

    #[tokio::test]
    async fn test_search_sends_key_and_params() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/search")
                    .header("authorization", "pexels-key")
                    .query_param("query", "mountain lake")
                    .query_param("per_page", "6");
                then.status(200).json_body(json!({
                    "page": 1,
                    "per_page": 6,
                    "photos": [photo_json(7, json!("Lake"), json!("#112233"))]
                }));
            })
            .await;

        let service = PexelsService::with_search_url(
            Client::new(),
            Some("pexels-key".to_string()),
            server.url("/v1/search"),
        );
        let photos = service.search("  mountain lake ", 6).await.unwrap();

        mock.assert_async().await;
        assert_eq!(photos.len(), 1);
        assert_eq!(
            photos[0].cover_url(),
            "https://images.pexels.com/photos/7/large.jpeg"
        );
    }

    #[tokio::test]
    async fn test_missing_photos_field_is_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/search");
                then.status(200).json_body(json!({"page": 1}));
            })
            .await;

        let service =
            PexelsService::with_search_url(Client::new(), Some("k".into()), server.url("/v1/search"));
        assert!(service.search("anything", 6).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_issues_no_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/search");
                then.status(200).json_body(json!({"photos": []}));
            })
            .await;

        let service =
            PexelsService::with_search_url(Client::new(), Some("k".into()), server.url("/v1/search"));
        assert!(service.search("   ", 6).await.unwrap().is_empty());
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_blank_key_is_not_configured() {
        let service = PexelsService::new(Client::new(), Some("  ".to_string()));
        let err = service.search("lake", 6).await.unwrap_err();
        assert!(matches!(err, PexelsError::NotConfigured));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/search");
                then.status(429);
            })
            .await;

        let service =
            PexelsService::with_search_url(Client::new(), Some("k".into()), server.url("/v1/search"));
        let err = service.search("lake", 6).await.unwrap_err();
        assert!(matches!(err, PexelsError::Status(429)));
    }
}
