//! Create-post screen
//!
//! Title changes arm a debounced Pexels lookup whose results are offered as
//! cover images. Drafts live in a [`DraftRegistry`] keyed by user id so the
//! debounced search can complete between page requests.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::ViewError;
use crate::auth::models::Session;
use crate::common::debounce::Debouncer;
use crate::common::helpers::{read_time_minutes, word_count};
use crate::common::Validator;
use crate::posts::models::{NewPost, Post, PostStatus};
use crate::posts::validators::{NewPostValidator, TITLE_AND_CONTENT_REQUIRED};
use crate::services::api::PostApi;
use crate::services::pexels::{ImageSearch, PexelsError, PexelsPhoto};

pub const SUGGESTIONS_PER_PAGE: u32 = 6;
pub const CREATE_POST_FAILED: &str = "Error when creating the post. Try it again.";

#[derive(Debug, Clone, Default)]
pub struct CreatePostState {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub recommended_images: Vec<PexelsPhoto>,
    pub selected_image: Option<PexelsPhoto>,
    pub image_loading: bool,
    pub submitting: bool,
    pub error: Option<String>,
    // ticket of the most recently issued image query
    pub(crate) search_seq: u64,
}

impl CreatePostState {
    pub fn word_count(&self) -> usize {
        word_count(&self.content)
    }

    pub fn read_time(&self) -> u32 {
        read_time_minutes(&self.content)
    }

    pub fn to_new_post(&self) -> NewPost {
        NewPost {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            status: self.status,
            cover_image: self
                .selected_image
                .as_ref()
                .map(|photo| photo.cover_url().to_string())
                .filter(|url| !url.is_empty()),
        }
    }
}

/// Form fields posted by the compose page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: Option<String>,
}

pub struct CreatePostView {
    state: Arc<RwLock<CreatePostState>>,
    debouncer: Debouncer,
    posts: Arc<dyn PostApi>,
    images: Arc<dyn ImageSearch>,
}

impl CreatePostView {
    pub fn new(posts: Arc<dyn PostApi>, images: Arc<dyn ImageSearch>) -> Self {
        Self::with_debouncer(posts, images, Debouncer::default())
    }

    pub fn with_debouncer(
        posts: Arc<dyn PostApi>,
        images: Arc<dyn ImageSearch>,
        debouncer: Debouncer,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(CreatePostState::default())),
            debouncer,
            posts,
            images,
        }
    }

    pub async fn snapshot(&self) -> CreatePostState {
        self.state.read().await.clone()
    }

    pub fn search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Title keystroke. Re-arms the suggestion timer; a blank title only
    /// cancels it.
    pub async fn set_title(&self, title: &str) {
        {
            let mut state = self.state.write().await;
            if state.title == title {
                return;
            }
            state.title = title.to_string();
        }

        let query = title.trim().to_string();
        if query.is_empty() {
            if self.debouncer.cancel() {
                debug!("Title cleared, pending image search cancelled");
            }
            return;
        }

        let state = Arc::clone(&self.state);
        let images = Arc::clone(&self.images);
        self.debouncer
            .schedule(move || fetch_suggestions(state, images, query));
    }

    pub async fn apply_form(&self, input: &DraftInput) {
        self.set_title(&input.title).await;

        let mut state = self.state.write().await;
        state.content = input.content.clone();
        if let Some(status) = input.status.as_deref() {
            state.status = PostStatus::parse(status);
        }
    }

    /// Uses one of the recommended photos as cover. Returns false when the
    /// id is not among the current recommendations.
    pub async fn select_image(&self, photo_id: u64) -> bool {
        let mut state = self.state.write().await;
        match state
            .recommended_images
            .iter()
            .find(|photo| photo.id == photo_id)
            .cloned()
        {
            Some(photo) => {
                state.selected_image = Some(photo);
                true
            }
            None => false,
        }
    }

    pub async fn remove_image(&self) {
        self.state.write().await.selected_image = None;
    }

    pub async fn submit(&self, session: &Session) -> Result<Post, ViewError> {
        let draft = {
            let mut state = self.state.write().await;
            let draft = state.to_new_post();

            let validation = NewPostValidator.validate(&draft);
            if !validation.is_valid {
                let message = validation
                    .first_message()
                    .unwrap_or(TITLE_AND_CONTENT_REQUIRED)
                    .to_string();
                state.error = Some(message.clone());
                return Err(ViewError::Invalid(message));
            }

            state.submitting = true;
            state.error = None;
            draft
        };

        let result = self.posts.create_post(&session.access_token, &draft).await;

        let mut state = self.state.write().await;
        state.submitting = false;
        match result {
            Ok(post) => {
                info!(
                    post_id = %post.id,
                    slug = %post.slug,
                    status = %post.status,
                    has_cover = post.cover_image.is_some(),
                    "Post created"
                );
                Ok(post)
            }
            Err(e) => {
                error!(error = %e, "Error creating post");
                state.error = Some(CREATE_POST_FAILED.to_string());
                Err(ViewError::Failed(CREATE_POST_FAILED.to_string()))
            }
        }
    }

    pub fn cancel_pending_search(&self) -> bool {
        self.debouncer.cancel()
    }
}

async fn fetch_suggestions(
    state: Arc<RwLock<CreatePostState>>,
    images: Arc<dyn ImageSearch>,
    query: String,
) {
    let ticket = {
        let mut state = state.write().await;
        state.search_seq += 1;
        state.image_loading = true;
        state.search_seq
    };

    let result = images.search(&query, SUGGESTIONS_PER_PAGE).await;

    let mut state = state.write().await;
    if state.search_seq != ticket {
        debug!(query = %query, "Discarding stale image suggestions");
        return;
    }
    state.image_loading = false;

    match result {
        Ok(photos) => {
            debug!(query = %query, count = photos.len(), "Image suggestions updated");
            state.recommended_images = photos;
        }
        Err(PexelsError::NotConfigured) => {
            debug!("Image suggestions disabled, no Pexels API key");
        }
        Err(e) => {
            warn!(error = %e, query = %query, "Error fetching Pexels images");
        }
    }
}

/// Drafts untouched for this long are dropped on the next sweep
pub const DRAFT_IDLE_LIMIT: Duration = Duration::from_secs(24 * 60 * 60);

struct Draft {
    view: Arc<CreatePostView>,
    touched: Instant,
}

/// Open create-post drafts, one per signed-in user
#[derive(Clone)]
pub struct DraftRegistry {
    drafts: Arc<RwLock<HashMap<String, Draft>>>,
    idle_limit: Duration,
}

impl Default for DraftRegistry {
    fn default() -> Self {
        Self::with_idle_limit(DRAFT_IDLE_LIMIT)
    }
}

impl DraftRegistry {
    pub fn with_idle_limit(idle_limit: Duration) -> Self {
        Self {
            drafts: Arc::new(RwLock::new(HashMap::new())),
            idle_limit,
        }
    }

    pub async fn get(&self, user_id: &str) -> Option<Arc<CreatePostView>> {
        let mut drafts = self.drafts.write().await;
        let draft = drafts.get_mut(user_id)?;
        draft.touched = Instant::now();
        Some(Arc::clone(&draft.view))
    }

    pub async fn get_or_create<F>(&self, user_id: &str, make: F) -> Arc<CreatePostView>
    where
        F: FnOnce() -> CreatePostView,
    {
        self.evict_idle().await;

        let mut drafts = self.drafts.write().await;
        let draft = drafts.entry(user_id.to_string()).or_insert_with(|| Draft {
            view: Arc::new(make()),
            touched: Instant::now(),
        });
        draft.touched = Instant::now();
        Arc::clone(&draft.view)
    }

    /// Drops the draft and cancels its pending search
    pub async fn remove(&self, user_id: &str) -> bool {
        match self.drafts.write().await.remove(user_id) {
            Some(draft) => {
                draft.view.cancel_pending_search();
                true
            }
            None => false,
        }
    }

    /// Drops drafts whose owner has not touched them within the idle limit
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut drafts = self.drafts.write().await;
        let before = drafts.len();
        drafts.retain(|user_id, draft| {
            let keep = now.duration_since(draft.touched) < self.idle_limit;
            if !keep {
                draft.view.cancel_pending_search();
                debug!(user_id = %user_id, "Evicted idle create-post draft");
            }
            keep
        });
        before - drafts.len()
    }

    pub async fn len(&self) -> usize {
        self.drafts.read().await.len()
    }
}
