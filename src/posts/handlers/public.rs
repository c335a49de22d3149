// src/posts/handlers/public.rs

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::Markup;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::auth::{CurrentSession, MaybeSession};
use crate::common::{AppError, AppState};
use crate::posts::models::{ListParams, SearchParams};
use crate::render;
use crate::views::post_detail::POST_NOT_FOUND;
use crate::views::{ListScope, PostDetailView, PostsListView, SearchView, WelcomeView};

/// GET / - Landing page
pub async fn welcome(MaybeSession(session): MaybeSession) -> Markup {
    let view = WelcomeView::for_session(session.as_ref());
    render::welcome::render(&view, session.as_ref())
}

/// GET /posts - Published posts, ten per page
pub async fn list_posts(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    MaybeSession(session): MaybeSession,
    Query(params): Query<ListParams>,
) -> Result<Markup, AppError> {
    let state = state_lock.read().await.clone();
    let scope = ListScope::Published;

    let view = PostsListView::load(&state.posts, &scope, session.as_ref(), params.page()).await?;
    Ok(render::listing::render(&view, &scope, session.as_ref()))
}

/// GET /me/posts - The signed-in user's posts, drafts included
pub async fn my_posts(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<ListParams>,
) -> Result<Markup, AppError> {
    let state = state_lock.read().await.clone();
    let scope = ListScope::Mine {
        status: params.status_filter(),
    };

    let view = PostsListView::load(&state.posts, &scope, Some(&session), params.page()).await?;
    Ok(render::listing::render(&view, &scope, Some(&session)))
}

/// GET /users/:user_id/posts - One author's published posts
pub async fn author_posts(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    MaybeSession(session): MaybeSession,
    Path(user_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Markup, AppError> {
    let state = state_lock.read().await.clone();
    let scope = ListScope::Author(user_id);

    let view = PostsListView::load(&state.posts, &scope, session.as_ref(), params.page()).await?;
    Ok(render::listing::render(&view, &scope, session.as_ref()))
}

/// GET /search?q= - Full-text post search
pub async fn search(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    MaybeSession(session): MaybeSession,
    Query(params): Query<SearchParams>,
) -> Markup {
    let state = state_lock.read().await.clone();
    let view = SearchView::run(&state.posts, &params.q).await;
    render::search::render(&view, session.as_ref())
}

/// GET /posts/:slug - Post with comments and like state
pub async fn post_detail(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    MaybeSession(session): MaybeSession,
    Path(slug): Path<String>,
) -> Response {
    let state = state_lock.read().await.clone();

    let mut view = PostDetailView::new(state.posts.clone(), state.comments.clone(), session);
    view.load(&slug).await;
    debug!(slug = %slug, loaded = view.state().post.is_some(), "Rendering post detail");

    detail_response(view, StatusCode::OK)
}

/// Renders the detail page from the view's current state. A blocking error
/// overrides `status`.
pub(crate) fn detail_response(view: PostDetailView, status: StatusCode) -> Response {
    let status = match view.state().blocking_error() {
        Some(POST_NOT_FOUND) => StatusCode::NOT_FOUND,
        Some(_) => StatusCode::BAD_GATEWAY,
        None => status,
    };
    let session = view.session().cloned();
    let state = view.into_state();
    (status, render::post::render(&state, session.as_ref())).into_response()
}
