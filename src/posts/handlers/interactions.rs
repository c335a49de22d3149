// src/posts/handlers/interactions.rs
//
// Mutations from the post detail page. Each one loads the post, applies the
// action and renders the page from the patched state.

use axum::{
    extract::{Extension, Form, Path},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::public::detail_response;
use crate::auth::models::Session;
use crate::auth::CurrentSession;
use crate::common::{AppError, AppState};
use crate::posts::models::{CommentForm, ConfirmForm};
use crate::views::{PostDetailView, ViewError};

/// Loads the post for a mutation. `Err` carries the page to return as is.
async fn load_for_action(
    state_lock: &Arc<RwLock<AppState>>,
    session: Session,
    slug: &str,
) -> Result<PostDetailView, Response> {
    let state = state_lock.read().await.clone();
    let mut view = PostDetailView::new(state.posts.clone(), state.comments.clone(), Some(session));
    view.load(slug).await;

    if view.state().blocking_error().is_some() {
        return Err(detail_response(view, StatusCode::OK));
    }
    Ok(view)
}

fn settle<T>(view: PostDetailView, result: Result<T, ViewError>) -> Result<Response, AppError> {
    match result {
        Ok(_) => Ok(detail_response(view, StatusCode::OK)),
        // The failure notice is already on the view state
        Err(ViewError::Failed(_)) => Ok(detail_response(view, StatusCode::BAD_GATEWAY)),
        Err(ViewError::Invalid(message)) => {
            let mut view = view;
            view.set_notice(message);
            Ok(detail_response(view, StatusCode::UNPROCESSABLE_ENTITY))
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /posts/:slug/comments
pub async fn add_comment(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    CurrentSession(session): CurrentSession,
    Path(slug): Path<String>,
    Form(form): Form<CommentForm>,
) -> Result<Response, AppError> {
    let mut view = match load_for_action(&state_lock, session, &slug).await {
        Ok(view) => view,
        Err(page) => return Ok(page),
    };
    let result = view.submit_comment(&form.content).await;
    settle(view, result)
}

/// POST /posts/:slug/comments/:comment_id/delete
pub async fn delete_comment(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    CurrentSession(session): CurrentSession,
    Path((slug, comment_id)): Path<(String, String)>,
    Form(form): Form<ConfirmForm>,
) -> Result<Response, AppError> {
    let mut view = match load_for_action(&state_lock, session, &slug).await {
        Ok(view) => view,
        Err(page) => return Ok(page),
    };
    let result = view.delete_comment(&comment_id, form.confirmed()).await;
    settle(view, result)
}

/// POST /posts/:slug/like - Like or unlike, whichever applies
pub async fn toggle_like(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    CurrentSession(session): CurrentSession,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let mut view = match load_for_action(&state_lock, session, &slug).await {
        Ok(view) => view,
        Err(page) => return Ok(page),
    };
    // A failed toggle leaves the page as loaded
    let result = view.toggle_like().await.or_else(|e| match e {
        ViewError::Failed(_) => Ok(false),
        other => Err(other),
    });
    settle(view, result)
}

/// POST /posts/:slug/delete - Author only; goes to the author's list
pub async fn delete_post(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    CurrentSession(session): CurrentSession,
    Path(slug): Path<String>,
    Form(form): Form<ConfirmForm>,
) -> Result<Response, AppError> {
    let mut view = match load_for_action(&state_lock, session, &slug).await {
        Ok(view) => view,
        Err(page) => return Ok(page),
    };
    match view.delete_post(form.confirmed()).await {
        Ok(()) => Ok(Redirect::to("/me/posts").into_response()),
        Err(e) => settle(view, Err::<(), _>(e)),
    }
}

/// POST /posts/:slug/publish - Author only
pub async fn publish_post(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    CurrentSession(session): CurrentSession,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let mut view = match load_for_action(&state_lock, session, &slug).await {
        Ok(view) => view,
        Err(page) => return Ok(page),
    };
    let result = view.publish().await;
    settle(view, result)
}
