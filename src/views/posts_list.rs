//! Paginated post listings: all published posts, the signed-in user's own
//! posts, or one author's posts

use std::sync::Arc;
use tracing::error;

use super::ViewError;
use crate::auth::models::Session;
use crate::posts::models::{PageQuery, Post, PostPage, PostStatus};
use crate::services::api::PostApi;

pub const LOAD_POSTS_FAILED: &str = "Error loading posts. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    Published,
    Mine { status: Option<PostStatus> },
    Author(String),
}

#[derive(Debug, Clone, Default)]
pub struct PostsListView {
    pub page: Option<PostPage>,
    pub error: Option<String>,
}

impl PostsListView {
    pub async fn load(
        posts: &Arc<dyn PostApi>,
        scope: &ListScope,
        session: Option<&Session>,
        page: u32,
    ) -> Result<Self, ViewError> {
        let mut query = PageQuery {
            page: page.max(1),
            ..Default::default()
        };

        let result = match scope {
            ListScope::Published => {
                query.status = Some(PostStatus::Published);
                posts.list_posts(query).await
            }
            ListScope::Mine { status } => {
                let session = session.ok_or(ViewError::SignInRequired)?;
                query.status = *status;
                posts.get_my_posts(&session.access_token, query).await
            }
            ListScope::Author(user_id) => posts.get_user_posts(user_id, query).await,
        };

        Ok(match result {
            Ok(page) => Self {
                page: Some(page),
                error: None,
            },
            Err(e) => {
                error!(error = %e, scope = ?scope, "Error fetching posts");
                Self {
                    page: None,
                    error: Some(LOAD_POSTS_FAILED.to_string()),
                }
            }
        })
    }

    pub fn posts(&self) -> &[Post] {
        self.page
            .as_ref()
            .map(|page| page.posts.as_slice())
            .unwrap_or(&[])
    }
}
