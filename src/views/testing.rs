//! In-memory stand-ins for the external services, shared by view and page tests

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::auth::models::{Session, SessionUser};
use crate::posts::models::{
    Comment, CommentAuthor, NewPost, PageQuery, Pagination, Post, PostAuthor, PostPage, PostStatus,
    PostUpdate,
};
use crate::services::api::{ApiClientError, CommentApi, PostApi};
use crate::services::pexels::{Attribution, ImageSearch, PexelsError, PexelsPhoto, PhotoSources};

/// Access tokens in tests are `token-<userId>`
pub fn session_for(user_id: &str) -> Session {
    Session {
        access_token: format!("token-{}", user_id),
        user: Some(SessionUser {
            user_id: user_id.to_string(),
            name: Some(format!("User {}", user_id)),
            email: Some(format!("{}@example.com", user_id.to_lowercase())),
            profile_picture: None,
            image: String::new(),
        }),
    }
}

fn user_from_token(token: &str) -> String {
    token.trim_start_matches("token-").to_string()
}

pub fn sample_post(id: &str, slug: &str, author_id: &str) -> Post {
    Post {
        id: id.to_string(),
        title: format!("Post {}", slug),
        content: "Some **markdown** content".to_string(),
        author: PostAuthor {
            user_id: author_id.to_string(),
            name: format!("User {}", author_id),
            email: None,
            profile_picture: None,
        },
        slug: slug.to_string(),
        created_at: "2024-01-05T09:30:00+00:00".to_string(),
        updated_at: None,
        status: PostStatus::Published,
        read_time: 1,
        views: 0,
        likes: 0,
        comments: Vec::new(),
        cover_image: None,
    }
}

pub fn sample_comment(id: &str, author_id: &str) -> Comment {
    Comment {
        id: id.to_string(),
        content: format!("Comment {}", id),
        author: CommentAuthor {
            user_id: author_id.to_string(),
            name: format!("User {}", author_id),
            profile_picture: None,
        },
        created_at: "2024-01-06T10:00:00+00:00".to_string(),
        likes: 0,
    }
}

pub fn sample_photo(id: u64, query: &str) -> PexelsPhoto {
    PexelsPhoto {
        id,
        width: 4000,
        height: 3000,
        url: format!("https://www.pexels.com/photo/{}/", id),
        attribution: Some(Attribution {
            name: "Jane Doe".to_string(),
            profile_url: Some("https://www.pexels.com/@jane".to_string()),
            id: None,
        }),
        avg_color: None,
        src: PhotoSources {
            large: format!("https://images.pexels.com/photos/{}/large.jpeg", id),
            medium: format!("https://images.pexels.com/photos/{}/medium.jpeg", id),
            ..Default::default()
        },
        liked: false,
        alt: Some(query.to_string()),
    }
}

fn server_error() -> ApiClientError {
    ApiClientError::Status {
        status: 500,
        message: "Internal server error".to_string(),
    }
}

fn not_found(what: &str) -> ApiClientError {
    ApiClientError::Status {
        status: 404,
        message: format!("{} not found", what),
    }
}

#[derive(Default)]
pub struct FakePostApi {
    pub posts: Mutex<Vec<Post>>,
    pub liked: Mutex<HashSet<(String, String)>>,
    pub failing: Mutex<HashSet<&'static str>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakePostApi {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let fake = Self::default();
        *fake.posts.lock().unwrap() = posts;
        fake
    }

    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, operation: &'static str) -> Result<(), ApiClientError> {
        self.calls.lock().unwrap().push(operation.to_string());
        if self.failing.lock().unwrap().contains(operation) {
            return Err(server_error());
        }
        Ok(())
    }

    fn adjust_likes(&self, post_id: &str, delta: i64) {
        if let Some(post) = self.posts.lock().unwrap().iter_mut().find(|p| p.id == post_id) {
            post.likes += delta;
        }
    }

    fn page(posts: Vec<Post>, query: PageQuery) -> PostPage {
        let total = posts.len() as u64;
        let limit = query.limit.max(1);
        let total_pages = ((total + limit as u64 - 1) / limit as u64) as u32;
        let skip = ((query.page.max(1) - 1) * limit) as usize;
        PostPage {
            posts: posts.into_iter().skip(skip).take(limit as usize).collect(),
            pagination: Pagination {
                total,
                page: query.page,
                limit,
                total_pages,
            },
        }
    }
}

#[async_trait]
impl PostApi for FakePostApi {
    async fn list_posts(&self, query: PageQuery) -> Result<PostPage, ApiClientError> {
        self.enter("list_posts")?;
        let status = query.status.unwrap_or(PostStatus::Published);
        let posts = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.status == status)
            .cloned()
            .collect();
        Ok(Self::page(posts, query))
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Post, ApiClientError> {
        self.enter("get_post_by_slug")?;
        self.posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
            .ok_or_else(|| not_found("Post"))
    }

    async fn search_posts(&self, query: &str) -> Result<Vec<Post>, ApiClientError> {
        self.enter("search_posts")?;
        let needle = query.to_lowercase();
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn create_post(&self, token: &str, post: &NewPost) -> Result<Post, ApiClientError> {
        self.enter("create_post")?;
        let mut posts = self.posts.lock().unwrap();
        let id = format!("p{}", posts.len() + 1);
        let slug = post.title.to_lowercase().replace(' ', "-");
        let mut created = sample_post(&id, &slug, &user_from_token(token));
        created.title = post.title.clone();
        created.content = post.content.clone();
        created.status = post.status;
        created.cover_image = post.cover_image.clone();
        posts.push(created.clone());
        Ok(created)
    }

    async fn update_post(
        &self,
        _token: &str,
        post_id: &str,
        update: &PostUpdate,
    ) -> Result<Post, ApiClientError> {
        self.enter("update_post")?;
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| not_found("Post"))?;
        if let Some(status) = update.status {
            post.status = status;
        }
        if let Some(title) = &update.title {
            post.title = title.clone();
        }
        Ok(post.clone())
    }

    async fn delete_post(&self, _token: &str, post_id: &str) -> Result<(), ApiClientError> {
        self.enter("delete_post")?;
        self.posts.lock().unwrap().retain(|p| p.id != post_id);
        Ok(())
    }

    async fn like_post(&self, token: &str, post_id: &str) -> Result<(), ApiClientError> {
        self.enter("like_post")?;
        let added = self
            .liked
            .lock()
            .unwrap()
            .insert((user_from_token(token), post_id.to_string()));
        if added {
            self.adjust_likes(post_id, 1);
        }
        Ok(())
    }

    async fn unlike_post(&self, token: &str, post_id: &str) -> Result<(), ApiClientError> {
        self.enter("unlike_post")?;
        let removed = self
            .liked
            .lock()
            .unwrap()
            .remove(&(user_from_token(token), post_id.to_string()));
        if removed {
            self.adjust_likes(post_id, -1);
        }
        Ok(())
    }

    async fn check_like(&self, token: &str, post_id: &str) -> Result<bool, ApiClientError> {
        self.enter("check_like")?;
        Ok(self
            .liked
            .lock()
            .unwrap()
            .contains(&(user_from_token(token), post_id.to_string())))
    }

    async fn get_user_posts(
        &self,
        user_id: &str,
        query: PageQuery,
    ) -> Result<PostPage, ApiClientError> {
        self.enter("get_user_posts")?;
        let posts = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.author.user_id == user_id && p.status == PostStatus::Published)
            .cloned()
            .collect();
        Ok(Self::page(posts, query))
    }

    async fn get_my_posts(&self, token: &str, query: PageQuery) -> Result<PostPage, ApiClientError> {
        self.enter("get_my_posts")?;
        let user_id = user_from_token(token);
        let posts = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.author.user_id == user_id)
            .filter(|p| query.status.map_or(true, |status| p.status == status))
            .cloned()
            .collect();
        Ok(Self::page(posts, query))
    }
}

#[derive(Default)]
pub struct FakeCommentApi {
    pub comments: Mutex<HashMap<String, Vec<Comment>>>,
    pub failing: Mutex<HashSet<&'static str>>,
    pub calls: Mutex<Vec<String>>,
    next_id: AtomicU64,
}

impl FakeCommentApi {
    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn seed(&self, post_id: &str, comments: Vec<Comment>) {
        self.comments
            .lock()
            .unwrap()
            .insert(post_id.to_string(), comments);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, operation: &'static str) -> Result<(), ApiClientError> {
        self.calls.lock().unwrap().push(operation.to_string());
        if self.failing.lock().unwrap().contains(operation) {
            return Err(server_error());
        }
        Ok(())
    }
}

#[async_trait]
impl CommentApi for FakeCommentApi {
    async fn get_comments(&self, post_id: &str) -> Result<Vec<Comment>, ApiClientError> {
        self.enter("get_comments")?;
        Ok(self
            .comments
            .lock()
            .unwrap()
            .get(post_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_comment(
        &self,
        token: &str,
        post_id: &str,
        content: &str,
    ) -> Result<Comment, ApiClientError> {
        self.enter("create_comment")?;
        let id = format!("c-new-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let mut comment = sample_comment(&id, &user_from_token(token));
        comment.content = content.to_string();
        self.comments
            .lock()
            .unwrap()
            .entry(post_id.to_string())
            .or_default()
            .push(comment.clone());
        Ok(comment)
    }

    async fn delete_comment(
        &self,
        _token: &str,
        post_id: &str,
        comment_id: &str,
    ) -> Result<(), ApiClientError> {
        self.enter("delete_comment")?;
        if let Some(comments) = self.comments.lock().unwrap().get_mut(post_id) {
            comments.retain(|c| c.id != comment_id);
        }
        Ok(())
    }
}

/// Records each query with the (paused) clock time it was issued at
pub struct FakeImageSearch {
    start: Instant,
    pub calls: Mutex<Vec<(String, Duration)>>,
    pub delays: Mutex<HashMap<String, Duration>>,
    pub failing: AtomicBool,
}

impl FakeImageSearch {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            calls: Mutex::new(Vec::new()),
            delays: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn delay(&self, query: &str, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert(query.to_string(), delay);
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(query, _)| query.clone())
            .collect()
    }
}

#[async_trait]
impl ImageSearch for FakeImageSearch {
    async fn search(&self, query: &str, per_page: u32) -> Result<Vec<PexelsPhoto>, PexelsError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), self.start.elapsed()));

        let delay = self.delays.lock().unwrap().get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(PexelsError::Status(500));
        }

        Ok((1..=per_page.min(2) as u64)
            .map(|n| sample_photo(n + query.len() as u64 * 100, query))
            .collect())
    }
}
