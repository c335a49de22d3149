//! Post detail screen: the post, its comments and the like toggle

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::ViewError;
use crate::auth::models::Session;
use crate::common::Validator;
use crate::posts::models::{Comment, Post, PostStatus, PostUpdate};
use crate::posts::validators::CommentValidator;
use crate::services::api::{CommentApi, PostApi};

pub const LOAD_POST_FAILED: &str = "Error loading post. Please try again.";
pub const POST_NOT_FOUND: &str = "This post could not be found";
pub const CREATE_COMMENT_FAILED: &str = "Error creating comment";
pub const DELETE_COMMENT_FAILED: &str = "Error deleting comment";
pub const DELETE_POST_FAILED: &str = "Error deleting post";
pub const PUBLISH_POST_FAILED: &str = "Error publishing post";

/// Advisory check: the comment's author or the post's author may delete it
pub fn can_delete_comment(session: Option<&Session>, post: &Post, comment: &Comment) -> bool {
    let Some(user_id) = session.and_then(|s| s.user_id()) else {
        return false;
    };
    user_id == comment.author.user_id || user_id == post.author.user_id
}

#[derive(Debug, Clone, Default)]
pub struct PostDetailState {
    pub post: Option<Post>,
    pub liked: bool,
    /// Inline banner for load failures
    pub error: Option<String>,
    /// Blocking notification for a failed mutation
    pub notice: Option<String>,
}

impl PostDetailState {
    /// Message shown instead of the article
    pub fn blocking_error(&self) -> Option<&str> {
        match (&self.error, &self.post) {
            (Some(error), _) => Some(error.as_str()),
            (None, None) => Some(POST_NOT_FOUND),
            (None, Some(_)) => None,
        }
    }
}

pub struct PostDetailView {
    posts: Arc<dyn PostApi>,
    comments: Arc<dyn CommentApi>,
    session: Option<Session>,
    state: PostDetailState,
}

impl PostDetailView {
    pub fn new(
        posts: Arc<dyn PostApi>,
        comments: Arc<dyn CommentApi>,
        session: Option<Session>,
    ) -> Self {
        Self {
            posts,
            comments,
            session,
            state: PostDetailState::default(),
        }
    }

    pub fn state(&self) -> &PostDetailState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn into_state(self) -> PostDetailState {
        self.state
    }

    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.state.notice = Some(message.into());
    }

    pub fn can_delete(&self, comment: &Comment) -> bool {
        self.state
            .post
            .as_ref()
            .map_or(false, |post| can_delete_comment(self.session.as_ref(), post, comment))
    }

    pub fn is_post_author(&self) -> bool {
        match (&self.state.post, self.session.as_ref().and_then(|s| s.user_id())) {
            (Some(post), Some(user_id)) => post.author.user_id == user_id,
            _ => false,
        }
    }

    pub async fn load(&mut self, slug: &str) {
        match self.posts.get_post_by_slug(slug).await {
            Ok(post) => {
                let liked = match &self.session {
                    Some(session) => self.fetch_liked(session, &post.id).await,
                    None => false,
                };
                self.state.liked = liked;
                self.state.post = Some(post);
                self.state.error = None;
            }
            Err(e) if e.is_not_found() => {
                debug!(slug = %slug, "Post not found");
                self.state.post = None;
                self.state.error = Some(POST_NOT_FOUND.to_string());
            }
            Err(e) => {
                error!(error = %e, slug = %slug, "Error fetching post");
                self.state.post = None;
                self.state.error = Some(LOAD_POST_FAILED.to_string());
            }
        }
    }

    async fn fetch_liked(&self, session: &Session, post_id: &str) -> bool {
        match self.posts.check_like(&session.access_token, post_id).await {
            Ok(liked) => liked,
            Err(e) => {
                warn!(error = %e, post_id = %post_id, "Could not check like status");
                false
            }
        }
    }

    fn require(&self) -> Result<(Session, String), ViewError> {
        let session = self.session.clone().ok_or(ViewError::SignInRequired)?;
        let post_id = self
            .state
            .post
            .as_ref()
            .map(|post| post.id.clone())
            .ok_or(ViewError::NotLoaded)?;
        Ok((session, post_id))
    }

    /// Appends the created comment to the local post on success
    pub async fn submit_comment(&mut self, content: &str) -> Result<Comment, ViewError> {
        let validation = CommentValidator.validate(content);
        if !validation.is_valid {
            return Err(ViewError::Invalid(
                validation.first_message().unwrap_or_default().to_string(),
            ));
        }
        let (session, post_id) = self.require()?;

        match self
            .comments
            .create_comment(&session.access_token, &post_id, content)
            .await
        {
            Ok(comment) => {
                info!(post_id = %post_id, comment_id = %comment.id, "Comment created");
                if let Some(post) = self.state.post.as_mut() {
                    post.comments.push(comment.clone());
                }
                Ok(comment)
            }
            Err(e) => {
                error!(error = %e, post_id = %post_id, "Error creating comment");
                self.state.notice = Some(CREATE_COMMENT_FAILED.to_string());
                Err(ViewError::Failed(CREATE_COMMENT_FAILED.to_string()))
            }
        }
    }

    /// Removes the comment locally once the API confirms the delete
    pub async fn delete_comment(&mut self, comment_id: &str, confirmed: bool) -> Result<(), ViewError> {
        let (session, post_id) = self.require()?;
        if !confirmed {
            return Err(ViewError::Cancelled);
        }

        let comment = self
            .state
            .post
            .as_ref()
            .and_then(|post| post.comments.iter().find(|c| c.id == comment_id))
            .cloned()
            .ok_or_else(|| ViewError::Invalid("Comment not found".to_string()))?;
        if !self.can_delete(&comment) {
            warn!(comment_id = %comment_id, "Comment delete attempted by non-author");
            return Err(ViewError::NotPermitted);
        }

        match self
            .comments
            .delete_comment(&session.access_token, &post_id, comment_id)
            .await
        {
            Ok(()) => {
                info!(post_id = %post_id, comment_id = %comment_id, "Comment deleted");
                if let Some(post) = self.state.post.as_mut() {
                    post.comments.retain(|c| c.id != comment_id);
                }
                Ok(())
            }
            Err(e) => {
                error!(error = %e, comment_id = %comment_id, "Error deleting comment");
                self.state.notice = Some(DELETE_COMMENT_FAILED.to_string());
                self.reconcile_comments(&post_id).await;
                Err(ViewError::Failed(DELETE_COMMENT_FAILED.to_string()))
            }
        }
    }

    /// Replaces the local comment list with the server's
    pub async fn reconcile_comments(&mut self, post_id: &str) {
        match self.comments.get_comments(post_id).await {
            Ok(comments) => {
                if let Some(post) = self.state.post.as_mut() {
                    debug!(
                        post_id = %post_id,
                        local = post.comments.len(),
                        server = comments.len(),
                        "Reconciled comments with server"
                    );
                    post.comments = comments;
                }
            }
            Err(e) => warn!(error = %e, post_id = %post_id, "Could not reconcile comments"),
        }
    }

    /// Flips the like state; counts only move after the API call succeeds
    pub async fn toggle_like(&mut self) -> Result<bool, ViewError> {
        let (session, post_id) = self.require()?;

        let result = if self.state.liked {
            self.posts.unlike_post(&session.access_token, &post_id).await
        } else {
            self.posts.like_post(&session.access_token, &post_id).await
        };

        match result {
            Ok(()) => {
                let delta = if self.state.liked { -1 } else { 1 };
                if let Some(post) = self.state.post.as_mut() {
                    post.likes += delta;
                }
                self.state.liked = !self.state.liked;
                debug!(post_id = %post_id, liked = self.state.liked, "Like toggled");
                Ok(self.state.liked)
            }
            Err(e) => {
                error!(error = %e, post_id = %post_id, "Error managing like");
                Err(ViewError::Failed(e.to_string()))
            }
        }
    }

    pub async fn delete_post(&mut self, confirmed: bool) -> Result<(), ViewError> {
        let (session, post_id) = self.require()?;
        if !confirmed {
            return Err(ViewError::Cancelled);
        }
        if !self.is_post_author() {
            return Err(ViewError::NotPermitted);
        }

        match self.posts.delete_post(&session.access_token, &post_id).await {
            Ok(()) => {
                info!(post_id = %post_id, "Post deleted");
                self.state.post = None;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, post_id = %post_id, "Error deleting post");
                self.state.notice = Some(DELETE_POST_FAILED.to_string());
                Err(ViewError::Failed(DELETE_POST_FAILED.to_string()))
            }
        }
    }

    /// Publishes a draft; the local post takes the server's copy
    pub async fn publish(&mut self) -> Result<(), ViewError> {
        let (session, post_id) = self.require()?;
        if !self.is_post_author() {
            return Err(ViewError::NotPermitted);
        }

        let update = PostUpdate {
            status: Some(PostStatus::Published),
            ..Default::default()
        };
        match self
            .posts
            .update_post(&session.access_token, &post_id, &update)
            .await
        {
            Ok(post) => {
                info!(post_id = %post_id, "Draft published");
                self.state.post = Some(post);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, post_id = %post_id, "Error publishing post");
                self.state.notice = Some(PUBLISH_POST_FAILED.to_string());
                Err(ViewError::Failed(PUBLISH_POST_FAILED.to_string()))
            }
        }
    }
}
