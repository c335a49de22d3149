// src/posts/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Create the router for every post page and the forms they submit
pub fn posts_routes() -> Router {
    Router::new()
        // Public pages
        .route("/", get(handlers::welcome))
        .route("/posts", get(handlers::list_posts))
        .route("/search", get(handlers::search))
        .route("/users/:user_id/posts", get(handlers::author_posts))
        .route("/me/posts", get(handlers::my_posts))
        // Compose
        .route(
            "/posts/new",
            get(handlers::compose_page).post(handlers::compose_submit),
        )
        .route("/posts/new/title", post(handlers::update_title))
        .route("/posts/new/suggestions", get(handlers::suggestions))
        .route("/posts/new/cover", post(handlers::choose_cover))
        // Post detail and its forms
        .route("/posts/:slug", get(handlers::post_detail))
        .route("/posts/:slug/comments", post(handlers::add_comment))
        .route(
            "/posts/:slug/comments/:comment_id/delete",
            post(handlers::delete_comment),
        )
        .route("/posts/:slug/like", post(handlers::toggle_like))
        .route("/posts/:slug/delete", post(handlers::delete_post))
        .route("/posts/:slug/publish", post(handlers::publish_post))
}
