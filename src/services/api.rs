// src/services/api.rs
//! Client for the Postly REST API
//!
//! `AuthService`, `PostService` and `CommentService` share one [`ApiClient`].
//! Views depend on the [`PostApi`] / [`CommentApi`] traits rather than the
//! concrete services.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::auth::models::{ApiUser, AuthResponse, IdentityAssertion};
use crate::auth::pipeline::TokenExchange;
use crate::posts::models::{
    Comment, LikeStatus, NewPost, PageQuery, Post, PostPage, PostUpdate,
};

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ApiClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiClientError::Status { status: 404, .. })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct MessageBody {
    #[allow(dead_code)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiClientError> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, base_url = %self.base_url, "HTTP error contacting Postly API");
            ApiClientError::RequestFailed(e.to_string())
        })?;

        let status = response.status();
        let url = response.url().path().to_string();
        debug!(http_status = %status, path = %url, "Received response from Postly API");

        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            };
            if status == StatusCode::NOT_FOUND {
                debug!(path = %url, error = %message, "Postly API resource not found");
            } else {
                warn!(http_status = %status, path = %url, error = %message, "Postly API returned error status");
            }
            return Err(ApiClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<T>().await.map_err(|e| {
            error!(error = %e, path = %url, "Failed to parse Postly API response");
            ApiClientError::MalformedResponse(e.to_string())
        })
    }
}

fn page_params(query: &PageQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", query.page.to_string()),
        ("limit", query.limit.to_string()),
    ];
    if let Some(status) = query.status {
        params.push(("status", status.to_string()));
    }
    params
}

// ============================================================================
// Seams used by the views
// ============================================================================

#[async_trait]
pub trait PostApi: Send + Sync {
    async fn list_posts(&self, query: PageQuery) -> Result<PostPage, ApiClientError>;
    async fn get_post_by_slug(&self, slug: &str) -> Result<Post, ApiClientError>;
    async fn search_posts(&self, query: &str) -> Result<Vec<Post>, ApiClientError>;
    async fn create_post(&self, token: &str, post: &NewPost) -> Result<Post, ApiClientError>;
    async fn update_post(
        &self,
        token: &str,
        post_id: &str,
        update: &PostUpdate,
    ) -> Result<Post, ApiClientError>;
    async fn delete_post(&self, token: &str, post_id: &str) -> Result<(), ApiClientError>;
    async fn like_post(&self, token: &str, post_id: &str) -> Result<(), ApiClientError>;
    async fn unlike_post(&self, token: &str, post_id: &str) -> Result<(), ApiClientError>;
    async fn check_like(&self, token: &str, post_id: &str) -> Result<bool, ApiClientError>;
    async fn get_user_posts(&self, user_id: &str, query: PageQuery)
        -> Result<PostPage, ApiClientError>;
    async fn get_my_posts(&self, token: &str, query: PageQuery) -> Result<PostPage, ApiClientError>;
}

#[async_trait]
pub trait CommentApi: Send + Sync {
    async fn get_comments(&self, post_id: &str) -> Result<Vec<Comment>, ApiClientError>;
    async fn create_comment(
        &self,
        token: &str,
        post_id: &str,
        content: &str,
    ) -> Result<Comment, ApiClientError>;
    async fn delete_comment(
        &self,
        token: &str,
        post_id: &str,
        comment_id: &str,
    ) -> Result<(), ApiClientError>;
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// POST /api/auth/login
    pub async fn login_with_google(&self, id_token: &str) -> Result<AuthResponse, ApiClientError> {
        self.api
            .send(
                self.api
                    .request(Method::POST, "/api/auth/login", None)
                    .json(&json!({ "token": id_token })),
            )
            .await
    }

    /// GET /api/auth/check - the user behind an access token
    pub async fn check_auth(&self, token: &str) -> Result<ApiUser, ApiClientError> {
        self.api
            .send(self.api.request(Method::GET, "/api/auth/check", Some(token)))
            .await
    }
}

#[async_trait]
impl TokenExchange for AuthService {
    async fn exchange(&self, assertion: &IdentityAssertion) -> Result<AuthResponse, ApiClientError> {
        self.login_with_google(assertion.as_str()).await
    }
}

// ============================================================================
// Posts
// ============================================================================

#[derive(Debug, Clone)]
pub struct PostService {
    api: ApiClient,
}

impl PostService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PostApi for PostService {
    async fn list_posts(&self, query: PageQuery) -> Result<PostPage, ApiClientError> {
        self.api
            .send(
                self.api
                    .request(Method::GET, "/api/posts", None)
                    .query(&page_params(&query)),
            )
            .await
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Post, ApiClientError> {
        let path = format!("/api/posts/slug/{}", urlencoding::encode(slug));
        self.api.send(self.api.request(Method::GET, &path, None)).await
    }

    async fn search_posts(&self, query: &str) -> Result<Vec<Post>, ApiClientError> {
        self.api
            .send(
                self.api
                    .request(Method::GET, "/api/posts/search", None)
                    .query(&[("q", query)]),
            )
            .await
    }

    async fn create_post(&self, token: &str, post: &NewPost) -> Result<Post, ApiClientError> {
        self.api
            .send(self.api.request(Method::POST, "/api/posts", Some(token)).json(post))
            .await
    }

    async fn update_post(
        &self,
        token: &str,
        post_id: &str,
        update: &PostUpdate,
    ) -> Result<Post, ApiClientError> {
        let path = format!("/api/posts/{}", post_id);
        self.api
            .send(self.api.request(Method::PUT, &path, Some(token)).json(update))
            .await
    }

    async fn delete_post(&self, token: &str, post_id: &str) -> Result<(), ApiClientError> {
        let path = format!("/api/posts/{}", post_id);
        self.api
            .send::<MessageBody>(self.api.request(Method::DELETE, &path, Some(token)))
            .await
            .map(|_| ())
    }

    async fn like_post(&self, token: &str, post_id: &str) -> Result<(), ApiClientError> {
        let path = format!("/api/posts/{}/like", post_id);
        self.api
            .send::<MessageBody>(self.api.request(Method::POST, &path, Some(token)))
            .await
            .map(|_| ())
    }

    async fn unlike_post(&self, token: &str, post_id: &str) -> Result<(), ApiClientError> {
        let path = format!("/api/posts/{}/like", post_id);
        self.api
            .send::<MessageBody>(self.api.request(Method::DELETE, &path, Some(token)))
            .await
            .map(|_| ())
    }

    async fn check_like(&self, token: &str, post_id: &str) -> Result<bool, ApiClientError> {
        let path = format!("/api/posts/{}/like", post_id);
        self.api
            .send::<LikeStatus>(self.api.request(Method::GET, &path, Some(token)))
            .await
            .map(|status| status.liked)
    }

    async fn get_user_posts(
        &self,
        user_id: &str,
        query: PageQuery,
    ) -> Result<PostPage, ApiClientError> {
        let path = format!("/api/users/{}/posts", urlencoding::encode(user_id));
        self.api
            .send(
                self.api
                    .request(Method::GET, &path, None)
                    .query(&page_params(&query)),
            )
            .await
    }

    async fn get_my_posts(&self, token: &str, query: PageQuery) -> Result<PostPage, ApiClientError> {
        self.api
            .send(
                self.api
                    .request(Method::GET, "/api/users/me/posts", Some(token))
                    .query(&page_params(&query)),
            )
            .await
    }
}

// ============================================================================
// Comments
// ============================================================================

#[derive(Debug, Clone)]
pub struct CommentService {
    api: ApiClient,
}

impl CommentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CommentApi for CommentService {
    async fn get_comments(&self, post_id: &str) -> Result<Vec<Comment>, ApiClientError> {
        let path = format!("/api/posts/{}/comments", post_id);
        self.api.send(self.api.request(Method::GET, &path, None)).await
    }

    async fn create_comment(
        &self,
        token: &str,
        post_id: &str,
        content: &str,
    ) -> Result<Comment, ApiClientError> {
        let path = format!("/api/posts/{}/comments", post_id);
        self.api
            .send(
                self.api
                    .request(Method::POST, &path, Some(token))
                    .json(&json!({ "content": content })),
            )
            .await
    }

    async fn delete_comment(
        &self,
        token: &str,
        post_id: &str,
        comment_id: &str,
    ) -> Result<(), ApiClientError> {
        let path = format!("/api/posts/{}/comments/{}", post_id, comment_id);
        self.api
            .send::<MessageBody>(self.api.request(Method::DELETE, &path, Some(token)))
            .await
            .map(|_| ())
    }
}
