// Application state shared across all modules

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use super::config::Config;
use crate::auth::pipeline::{SessionPipeline, TokenExchange};
use crate::auth::session_cookie::SessionCodec;
use crate::services::{
    ApiClient, AuthService, CommentApi, CommentService, GoogleService, ImageSearch, PexelsService,
    PostApi, PostService,
};
use crate::views::DraftRegistry;

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Application state containing configuration, service clients and drafts
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub http: Client,
    pub sessions: SessionCodec,
    pub pipeline: SessionPipeline,
    pub auth: Arc<AuthService>,
    pub google_service: Arc<GoogleService>,
    pub posts: Arc<dyn PostApi>,
    pub comments: Arc<dyn CommentApi>,
    pub images: Arc<dyn ImageSearch>,
    pub drafts: DraftRegistry,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(HTTP_TIMEOUT).build()?;

        let api = ApiClient::new(http.clone(), config.api_url.clone());
        let auth = Arc::new(AuthService::new(api.clone()));
        let exchange: Arc<dyn TokenExchange> = auth.clone();
        let google_service = Arc::new(GoogleService::new(
            http.clone(),
            config.google_client_id.clone(),
            config.google_client_secret.clone(),
        ));
        let images = Arc::new(PexelsService::new(
            http.clone(),
            config.pexels_api_key.clone(),
        ));

        Ok(Self {
            sessions: SessionCodec::new(&config.session_secret, config.secure_cookies()),
            pipeline: SessionPipeline::new(exchange),
            auth,
            google_service,
            posts: Arc::new(PostService::new(api.clone())),
            comments: Arc::new(CommentService::new(api)),
            images,
            drafts: DraftRegistry::default(),
            http,
            config,
        })
    }
}

#[cfg(test)]
impl AppState {
    /// State wired to in-memory services and a mock identity provider
    pub fn for_tests(
        google_service: GoogleService,
        exchange: Arc<dyn TokenExchange>,
        posts: Arc<dyn PostApi>,
        comments: Arc<dyn CommentApi>,
        images: Arc<dyn ImageSearch>,
    ) -> Self {
        let config = Config::for_tests("http://127.0.0.1:9");
        let http = Client::new();
        Self {
            auth: Arc::new(AuthService::new(ApiClient::new(
                http.clone(),
                config.api_url.clone(),
            ))),
            http,
            sessions: SessionCodec::new(&config.session_secret, false),
            pipeline: SessionPipeline::new(exchange),
            google_service: Arc::new(google_service),
            posts,
            comments,
            images,
            drafts: DraftRegistry::default(),
            config,
        }
    }
}
