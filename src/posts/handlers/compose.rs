// src/posts/handlers/compose.rs
//
// Create-post page. The draft lives server side, one per signed-in user, so
// the title debounce and image suggestions survive between requests.

use axum::{
    extract::{Extension, Form},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use maud::Markup;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::auth::models::Session;
use crate::auth::CurrentSession;
use crate::common::{AppError, AppState};
use crate::posts::models::{CoverForm, DraftForm, TitleForm};
use crate::render;
use crate::views::create_post::DraftInput;
use crate::views::{CreatePostView, ViewError};

pub const SUGGESTIONS_PENDING_HEADER: &str = "x-suggestions-pending";

fn draft_key(session: &Session) -> String {
    session
        .user_id()
        .map(str::to_string)
        .unwrap_or_else(|| session.access_token.clone())
}

async fn draft_for(state: &AppState, session: &Session) -> Arc<CreatePostView> {
    let posts = state.posts.clone();
    let images = state.images.clone();
    state
        .drafts
        .get_or_create(&draft_key(session), move || CreatePostView::new(posts, images))
        .await
}

/// GET /posts/new - Compose page
pub async fn compose_page(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    CurrentSession(session): CurrentSession,
) -> Markup {
    let state = state_lock.read().await.clone();
    let draft = draft_for(&state, &session).await;
    render::compose::render(&draft.snapshot().await, &session)
}

/// POST /posts/new - Save the post, or refresh suggestions without script
pub async fn compose_submit(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    CurrentSession(session): CurrentSession,
    Form(form): Form<DraftForm>,
) -> Result<Response, AppError> {
    let state = state_lock.read().await.clone();
    let draft = draft_for(&state, &session).await;

    draft
        .apply_form(&DraftInput {
            title: form.title,
            content: form.content,
            status: form.status,
        })
        .await;

    if form.intent.as_deref() == Some("suggest") {
        return Ok(Redirect::to("/posts/new").into_response());
    }

    match draft.submit(&session).await {
        Ok(post) => {
            state.drafts.remove(&draft_key(&session)).await;
            info!(slug = %post.slug, "Redirecting to new post");
            Ok(Redirect::to(&format!("/posts/{}", post.slug)).into_response())
        }
        Err(e @ (ViewError::Invalid(_) | ViewError::Failed(_))) => {
            let status = match e {
                ViewError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_GATEWAY,
            };
            let page = render::compose::render(&draft.snapshot().await, &session);
            Ok((status, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /posts/new/title - Title keystroke from the compose script
pub async fn update_title(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    CurrentSession(session): CurrentSession,
    Form(form): Form<TitleForm>,
) -> StatusCode {
    let state = state_lock.read().await.clone();
    let draft = draft_for(&state, &session).await;
    draft.set_title(&form.title).await;
    StatusCode::NO_CONTENT
}

/// GET /posts/new/suggestions - Suggestion picker fragment
///
/// `X-Suggestions-Pending: true` tells the script to poll again.
pub async fn suggestions(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    CurrentSession(session): CurrentSession,
) -> Response {
    let state = state_lock.read().await.clone();
    let draft = draft_for(&state, &session).await;
    let snapshot = draft.snapshot().await;

    let pending = draft.search_pending() || snapshot.image_loading;
    (
        [(
            HeaderName::from_static(SUGGESTIONS_PENDING_HEADER),
            HeaderValue::from_static(if pending { "true" } else { "false" }),
        )],
        render::compose::suggestions(&snapshot),
    )
        .into_response()
}

/// POST /posts/new/cover - Pick or remove the cover image
pub async fn choose_cover(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    CurrentSession(session): CurrentSession,
    Form(form): Form<CoverForm>,
) -> Result<Redirect, AppError> {
    let state = state_lock.read().await.clone();
    let draft = draft_for(&state, &session).await;

    draft
        .apply_form(&DraftInput {
            title: form.title,
            content: form.content,
            status: form.status,
        })
        .await;

    if form.remove_photo.is_some() {
        draft.remove_image().await;
        debug!("Cover image removed");
    } else if let Some(raw) = form.select_photo.as_deref() {
        let photo_id: u64 = raw
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid photo id".to_string()))?;
        if !draft.select_image(photo_id).await {
            debug!(photo_id, "Selected photo is no longer suggested");
        }
    }

    Ok(Redirect::to("/posts/new"))
}
