//! Post detail page

use maud::{html, Markup, PreEscaped};

use super::components::{avatar, cover_image, error_banner, notice, page_shell, render_markdown};
use crate::auth::models::Session;
use crate::common::helpers::{format_date, format_date_time};
use crate::posts::models::{Comment, Post, PostStatus};
use crate::views::{can_delete_comment, PostDetailState};

const CONFIRM_DELETE_COMMENT: &str =
    "return confirm('Are you sure you want to delete this comment?')";
const CONFIRM_DELETE_POST: &str = "return confirm('Are you sure you want to delete this post?')";

pub fn render(state: &PostDetailState, session: Option<&Session>) -> Markup {
    let (title, body) = match (&state.post, state.blocking_error()) {
        (Some(post), None) => (post.title.as_str(), article(post, state, session)),
        (_, error) => (
            "Post",
            error_banner(error.unwrap_or(crate::views::post_detail::POST_NOT_FOUND)),
        ),
    };

    page_shell(title, session, body)
}

fn article(post: &Post, state: &PostDetailState, session: Option<&Session>) -> Markup {
    let base = format!("/posts/{}", post.slug);
    let is_author = session
        .and_then(|s| s.user_id())
        .map_or(false, |id| id == post.author.user_id);
    let like_class = if state.liked { "btn" } else { "btn secondary" };

    html! {
        @if let Some(message) = &state.notice {
            (notice(message))
        }
        article class="card article" {
            @if let Some(url) = post.cover_image.as_deref().filter(|u| !u.is_empty()) {
                (cover_image(url, &post.title))
            }
            @if post.status == PostStatus::Draft {
                p class="meta" { strong { "Draft" } " Only you can see this post." }
            }
            h1 { (post.title) }
            div class="meta" {
                (avatar(&post.author.name, post.author.profile_picture.as_deref()))
                span { (post.author.name) }
                span { (format_date(&post.created_at)) }
                span { (post.read_time) " min read" }
                span { (post.views) " views" }
            }
            div class="article-content" {
                (PreEscaped(render_markdown(&post.content)))
            }
            div class="meta" {
                @if session.is_some() {
                    form action={ (base) "/like" } method="post" {
                        button class=(like_class) type="submit" aria-pressed=(state.liked) {
                            @if state.liked { "Liked" } @else { "Like" }
                            " (" (post.likes) ")"
                        }
                    }
                } @else {
                    span { (post.likes) " likes" }
                }
                span { (post.comments.len()) " comments" }
            }
            @if is_author {
                div class="meta" {
                    @if post.status == PostStatus::Draft {
                        form action={ (base) "/publish" } method="post" {
                            button class="btn" type="submit" { "Publish" }
                        }
                    }
                    form action={ (base) "/delete" } method="post" onsubmit=(CONFIRM_DELETE_POST) {
                        input type="hidden" name="confirm" value="yes";
                        button class="btn danger" type="submit" { "Delete post" }
                    }
                }
            }
        }
        section class="card" id="comments" {
            h2 { "Comments (" (post.comments.len()) ")" }
            @if session.is_some() {
                form class="stack" action={ (base) "/comments" } method="post" {
                    textarea name="content" placeholder="Write a comment..." required {}
                    div { button class="btn" type="submit" { "Comment" } }
                }
            } @else {
                p class="meta" { a href="/auth/signin" { "Sign in" } " to join the conversation." }
            }
            @if post.comments.is_empty() {
                p class="empty" { "No comments yet. Be the first!" }
            }
            @for comment in &post.comments {
                (comment_item(&base, post, comment, session))
            }
        }
    }
}

fn comment_item(base: &str, post: &Post, comment: &Comment, session: Option<&Session>) -> Markup {
    html! {
        div class="comment" id={ "comment-" (comment.id) } {
            (avatar(&comment.author.name, comment.author.profile_picture.as_deref()))
            div class="comment-body" {
                div class="comment-head" {
                    strong { (comment.author.name) }
                    span class="meta" { (format_date_time(&comment.created_at)) }
                }
                p { (comment.content) }
                @if can_delete_comment(session, post, comment) {
                    form action={ (base) "/comments/" (comment.id) "/delete" } method="post" onsubmit=(CONFIRM_DELETE_COMMENT) {
                        input type="hidden" name="confirm" value="yes";
                        button class="btn link" type="submit" { "Delete" }
                    }
                }
            }
        }
    }
}
