//! Create-post page and its suggestion fragment

use maud::{html, Markup, PreEscaped};

use super::components::{error_banner, page_shell, pexels_attribution, COMPOSE_JS};
use crate::auth::models::Session;
use crate::posts::models::PostStatus;
use crate::views::CreatePostState;

pub fn render(state: &CreatePostState, session: &Session) -> Markup {
    let body = html! {
        div class="card" {
            h1 { "Create new publication" }
            p class="meta" { "Share your ideas with the Postly community" }
        }
        @if let Some(error) = &state.error {
            (error_banner(error))
        }
        form class="card stack" action="/posts/new" method="post" {
            label for="title" { "Title" }
            input type="text" id="title" name="title" value=(state.title) placeholder="Write a descriptive title" autocomplete="off";

            div {
                label { "Cover image" }
                @if let Some(photo) = &state.selected_image {
                    div {
                        img class="cover" src=(photo.cover_url()) alt=(photo.alt_text());
                        p class="attribution" {
                            "Photo by "
                            @match photo.attribution.as_ref().and_then(|a| a.profile_url.as_deref()) {
                                Some(url) => {
                                    a href=(url) target="_blank" rel="noopener noreferrer" { (photo.photographer()) }
                                }
                                None => { (photo.photographer()) }
                            }
                            " on Pexels"
                        }
                        button class="btn secondary" type="submit" name="remove_photo" value="1" formaction="/posts/new/cover" { "Remove image" }
                    }
                }
                div id="suggestions" { (suggestions(state)) }
                button class="btn link" type="submit" name="intent" value="suggest" { "Refresh suggestions" }
            }

            label for="content" { "Content" }
            textarea id="content" name="content" placeholder="Write your post in Markdown..." { (state.content) }
            p class="meta" {
                span { (state.word_count()) " words" }
                span { "About " (state.read_time()) " min read" }
            }

            label for="status" { "Status" }
            select id="status" name="status" {
                option value="published" selected[state.status == PostStatus::Published] { "Published" }
                option value="draft" selected[state.status == PostStatus::Draft] { "Draft" }
            }

            div {
                button class="btn" type="submit" name="intent" value="publish" disabled[state.submitting] {
                    @if state.submitting { "Saving..." } @else { "Save post" }
                }
            }
        }
        script { (PreEscaped(COMPOSE_JS)) }
    };

    page_shell("Create post", Some(session), body)
}

/// Recommended images; served on its own to refresh the picker
pub fn suggestions(state: &CreatePostState) -> Markup {
    let selected = state.selected_image.as_ref().map(|p| p.id);
    html! {
        @if state.image_loading {
            p class="meta" { "Looking for images..." }
        } @else if state.recommended_images.is_empty() {
            p class="meta" { "Type a title to get image suggestions." }
        } @else {
            div class="suggestions" {
                @for photo in &state.recommended_images {
                    button type="submit" name="select_photo" value=(photo.id) formaction="/posts/new/cover"
                        class=[(selected == Some(photo.id)).then_some("selected")]
                        style={ "background:" (photo.placeholder_color()) }
                        title=(photo.photographer()) {
                        img src=(photo.thumbnail_url()) alt=(photo.alt_text()) loading="lazy";
                    }
                }
            }
            (pexels_attribution())
        }
    }
}
