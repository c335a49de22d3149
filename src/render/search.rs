//! Search results page

use maud::{html, Markup};

use super::components::{error_banner, page_shell, post_card};
use crate::auth::models::Session;
use crate::views::search::NO_RESULTS;
use crate::views::SearchView;

pub fn render(view: &SearchView, session: Option<&Session>) -> Markup {
    let body = html! {
        div class="card" {
            h1 { "Search" }
            form class="stack" action="/search" method="get" {
                input type="text" name="q" value=(view.query) placeholder="Search posts..." autofocus;
            }
            @if view.has_query() {
                p class="meta" { "Results for \"" (view.query) "\"" }
            }
        }
        @if let Some(error) = &view.error {
            (error_banner(error))
        }
        @if let Some(summary) = view.summary() {
            p class="meta" { (summary) }
        }
        @if view.is_empty_result() {
            p class="empty" { (NO_RESULTS) }
        }
        @for post in &view.posts {
            (post_card(post))
        }
    };

    page_shell("Search", session, body)
}
