//! Tests for posts module
//!
//! These tests drive the page routes end to end against in-memory services:
//! - listings, search and the detail page
//! - comment, like and author actions from the detail page
//! - the compose flow with debounced cover suggestions

#[cfg(test)]
mod tests {
    use super::super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{
            header::{CONTENT_TYPE, COOKIE, LOCATION},
            Request, StatusCode,
        },
        response::Response,
        Extension, Router,
    };
    use reqwest::Client;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::RwLock;
    use tower::ServiceExt;
    use tower_cookies::CookieManagerLayer;

    use crate::auth::models::{ApiUser, SessionRecord};
    use crate::auth::pipeline::TokenExchange;
    use crate::auth::session_cookie::{SessionCodec, SESSION_COOKIE};
    use crate::common::AppState;
    use crate::services::api::ApiClient;
    use crate::services::{AuthService, GoogleService};
    use crate::views::post_detail::POST_NOT_FOUND;
    use crate::views::testing::{
        sample_comment, sample_post, FakeCommentApi, FakeImageSearch, FakePostApi,
    };
    use crate::views::DraftRegistry;

    struct Harness {
        router: Router,
        codec: SessionCodec,
        drafts: DraftRegistry,
        posts: Arc<FakePostApi>,
        comments: Arc<FakeCommentApi>,
        images: Arc<FakeImageSearch>,
    }

    impl Harness {
        fn new(seed: Vec<models::Post>) -> Self {
            let posts = Arc::new(FakePostApi::with_posts(seed));
            let comments = Arc::new(FakeCommentApi::default());
            let images = Arc::new(FakeImageSearch::new());
            let exchange: Arc<dyn TokenExchange> = Arc::new(AuthService::new(ApiClient::new(
                Client::new(),
                "http://127.0.0.1:9",
            )));

            let state = AppState::for_tests(
                GoogleService::new(Client::new(), "client-id", "client-secret"),
                exchange,
                posts.clone(),
                comments.clone(),
                images.clone(),
            );
            let codec = state.sessions.clone();
            let drafts = state.drafts.clone();
            let router = posts_routes()
                .layer(Extension(Arc::new(RwLock::new(state))))
                .layer(CookieManagerLayer::new());

            Self {
                router,
                codec,
                drafts,
                posts,
                comments,
                images,
            }
        }

        fn cookie_for(&self, user_id: &str) -> String {
            let record = SessionRecord {
                access_token: Some(format!("token-{}", user_id)),
                user: Some(ApiUser {
                    user_id: user_id.to_string(),
                    name: Some(format!("User {}", user_id)),
                    ..Default::default()
                }),
                user_image: None,
            };
            format!("{}={}", SESSION_COOKIE, self.codec.encode(&record).unwrap())
        }

        async fn get(&self, uri: &str, user: Option<&str>) -> Response {
            let mut request = Request::get(uri);
            if let Some(user_id) = user {
                request = request.header(COOKIE, self.cookie_for(user_id));
            }
            self.router
                .clone()
                .oneshot(request.body(Body::empty()).unwrap())
                .await
                .unwrap()
        }

        async fn post_form(&self, uri: &str, user: Option<&str>, form: &str) -> Response {
            let mut request = Request::post(uri)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
            if let Some(user_id) = user {
                request = request.header(COOKIE, self.cookie_for(user_id));
            }
            self.router
                .clone()
                .oneshot(request.body(Body::from(form.to_string())).unwrap())
                .await
                .unwrap()
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    fn post_with_comments() -> models::Post {
        let mut post = sample_post("p1", "hello", "U1");
        post.likes = 5;
        post.comments = vec![sample_comment("c1", "U2")];
        post
    }

    // ========================================================================
    // Public pages
    // ========================================================================

    #[tokio::test]
    async fn test_listing_and_author_pages() {
        let h = Harness::new(vec![
            sample_post("p1", "hello", "U1"),
            sample_post("p2", "world", "U2"),
        ]);

        let html = body_text(h.get("/posts", None).await).await;
        assert!(html.contains("href=\"/posts/hello\""));
        assert!(html.contains("href=\"/posts/world\""));

        let html = body_text(h.get("/users/U2/posts", None).await).await;
        assert!(html.contains("href=\"/posts/world\""));
        assert!(!html.contains("href=\"/posts/hello\""));
    }

    #[tokio::test]
    async fn test_malformed_page_falls_back_to_first_page() {
        let h = Harness::new(vec![sample_post("p1", "hello", "U1")]);

        for uri in ["/posts?page=abc", "/posts?page=-1", "/me/posts?page=x&status=draft"] {
            let response = h.get(uri, Some("U1")).await;
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        }

        let html = body_text(h.get("/posts?page=abc", None).await).await;
        assert!(html.contains("href=\"/posts/hello\""));
    }

    #[tokio::test]
    async fn test_my_posts_requires_session() {
        let mut draft = sample_post("p1", "draft-one", "U1");
        draft.status = models::PostStatus::Draft;
        let h = Harness::new(vec![draft]);

        let response = h.get("/me/posts", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let html = body_text(h.get("/me/posts?status=draft", Some("U1")).await).await;
        assert!(html.contains("href=\"/posts/draft-one\""));
    }

    #[tokio::test]
    async fn test_search_page() {
        let h = Harness::new(vec![sample_post("p1", "rust-tips", "U1")]);

        let html = body_text(h.get("/search?q=rust", None).await).await;
        assert!(html.contains("1 result(s) were found."));

        let response = h.get("/search", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(h.posts.calls(), vec!["search_posts".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_post_is_not_found() {
        let h = Harness::new(vec![]);
        let response = h.get("/posts/missing", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains(POST_NOT_FOUND));
    }

    // ========================================================================
    // Detail actions
    // ========================================================================

    #[tokio::test]
    async fn test_comment_is_appended_to_page() {
        let h = Harness::new(vec![post_with_comments()]);

        let response = h
            .post_form("/posts/hello/comments", Some("U3"), "content=Great+read")
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Great read"));
        assert!(html.contains("Comments (2)"));
        assert_eq!(h.comments.calls(), vec!["create_comment".to_string()]);
    }

    #[tokio::test]
    async fn test_blank_comment_is_rejected_without_request() {
        let h = Harness::new(vec![post_with_comments()]);

        let response = h
            .post_form("/posts/hello/comments", Some("U3"), "content=+++")
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(h.comments.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_comment_shows_notice() {
        let h = Harness::new(vec![post_with_comments()]);
        h.comments.fail("create_comment");

        let response = h
            .post_form("/posts/hello/comments", Some("U3"), "content=Hi")
            .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(body_text(response).await.contains("Error creating comment"));
    }

    #[tokio::test]
    async fn test_like_toggles_count() {
        let h = Harness::new(vec![post_with_comments()]);

        let html = body_text(h.post_form("/posts/hello/like", Some("U3"), "").await).await;
        assert!(html.contains("Liked"));
        assert!(html.contains(" (6)"));

        let html = body_text(h.post_form("/posts/hello/like", Some("U3"), "").await).await;
        assert!(html.contains(" (5)"));
    }

    #[tokio::test]
    async fn test_comment_delete_needs_confirmation_and_permission() {
        let h = Harness::new(vec![post_with_comments()]);

        let response = h
            .post_form("/posts/hello/comments/c1/delete", Some("U2"), "")
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = h
            .post_form("/posts/hello/comments/c1/delete", Some("U3"), "confirm=yes")
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Post author may remove comments by others
        let response = h
            .post_form("/posts/hello/comments/c1/delete", Some("U1"), "confirm=yes")
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Comments (0)"));
    }

    #[tokio::test]
    async fn test_author_deletes_post() {
        let h = Harness::new(vec![post_with_comments()]);

        let response = h
            .post_form("/posts/hello/delete", Some("U2"), "confirm=yes")
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = h
            .post_form("/posts/hello/delete", Some("U1"), "confirm=yes")
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/me/posts");
        assert!(h.posts.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_author_publishes_draft() {
        let mut draft = sample_post("p1", "hello", "U1");
        draft.status = models::PostStatus::Draft;
        let h = Harness::new(vec![draft]);

        let response = h.post_form("/posts/hello/publish", Some("U1"), "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!body_text(response).await.contains("/posts/hello/publish"));
        assert_eq!(
            h.posts.posts.lock().unwrap()[0].status,
            models::PostStatus::Published
        );
    }

    // ========================================================================
    // Compose
    // ========================================================================

    #[tokio::test]
    async fn test_compose_validation_and_success() {
        let h = Harness::new(vec![]);

        let response = h
            .post_form("/posts/new", Some("U1"), "title=+&content=Body&status=draft")
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains("Title and content are required"));

        let response = h
            .post_form(
                "/posts/new",
                Some("U1"),
                "title=My+First+Post&content=Hello+world&status=published&intent=publish",
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/posts/my-first-post");
        assert_eq!(h.drafts.len().await, 0);
    }

    #[tokio::test]
    async fn test_compose_failure_keeps_draft() {
        let h = Harness::new(vec![]);
        h.posts.fail("create_post");

        let response = h
            .post_form("/posts/new", Some("U1"), "title=Kept&content=Body")
            .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let html = body_text(response).await;
        assert!(html.contains("Error when creating the post. Try it again."));
        assert!(html.contains("value=\"Kept\""));
        assert_eq!(h.drafts.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_title_suggestions_and_cover_selection() {
        let h = Harness::new(vec![]);

        let response = h.post_form("/posts/new/title", Some("U1"), "title=lake").await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = h.get("/posts/new/suggestions", Some("U1")).await;
        assert_eq!(
            response.headers().get("x-suggestions-pending").unwrap(),
            "true"
        );

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(h.images.queries(), vec!["lake".to_string()]);

        let response = h.get("/posts/new/suggestions", Some("U1")).await;
        assert_eq!(
            response.headers().get("x-suggestions-pending").unwrap(),
            "false"
        );
        assert_eq!(body_text(response).await.matches("name=\"select_photo\"").count(), 2);

        let response = h
            .post_form(
                "/posts/new/cover",
                Some("U1"),
                "title=lake&content=&select_photo=401",
            )
            .await;
        assert_eq!(location(&response), "/posts/new");

        let html = body_text(h.get("/posts/new", Some("U1")).await).await;
        assert!(html.contains("Remove image"));
        assert!(html.contains("class=\"selected\""));

        h.post_form("/posts/new/cover", Some("U1"), "title=lake&remove_photo=1")
            .await;
        let html = body_text(h.get("/posts/new", Some("U1")).await).await;
        assert!(!html.contains("Remove image"));
    }

    #[tokio::test]
    async fn test_cover_rejects_bad_photo_id() {
        let h = Harness::new(vec![]);
        let response = h
            .post_form("/posts/new/cover", Some("U1"), "title=x&select_photo=abc")
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
