//! Post listings: the public feed, the signed-in user's posts and author pages

use maud::{html, Markup};

use super::components::{error_banner, page_shell, pager, post_card};
use crate::auth::models::Session;
use crate::posts::models::PostStatus;
use crate::views::{ListScope, PostsListView};

fn heading(scope: &ListScope) -> (&'static str, String) {
    match scope {
        ListScope::Published => ("Latest posts", "/posts".to_string()),
        ListScope::Mine { status: None } => ("My posts", "/me/posts".to_string()),
        ListScope::Mine {
            status: Some(status),
        } => ("My posts", format!("/me/posts?status={}", status)),
        ListScope::Author(user_id) => ("Posts by author", format!("/users/{}/posts", user_id)),
    }
}

pub fn render(view: &PostsListView, scope: &ListScope, session: Option<&Session>) -> Markup {
    let (title, base) = heading(scope);
    let mine_status = match scope {
        ListScope::Mine { status } => Some(*status),
        _ => None,
    };

    let body = html! {
        div class="card" {
            h1 { (title) }
            @if let Some(status) = mine_status {
                div class="meta" {
                    a href="/me/posts" aria-current=[status.is_none().then_some("page")] { "All" }
                    @for option in [PostStatus::Published, PostStatus::Draft] {
                        a href={ "/me/posts?status=" (option) }
                            aria-current=[(status == Some(option)).then_some("page")] {
                            @if option == PostStatus::Draft { "Drafts" } @else { "Published" }
                        }
                    }
                }
            }
        }
        @if let Some(error) = &view.error {
            (error_banner(error))
        }
        @if view.error.is_none() && view.posts().is_empty() {
            p class="empty" {
                "No posts yet. "
                @if session.is_some() {
                    a href="/posts/new" { "Write the first one" }
                }
            }
        }
        @for post in view.posts() {
            (post_card(post))
        }
        @if let Some(page) = &view.page {
            (pager(&base, &page.pagination))
        }
    };

    page_shell(title, session, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::models::{Pagination, PostPage};
    use crate::views::posts_list::LOAD_POSTS_FAILED;
    use crate::views::testing::{sample_post, session_for};

    fn view_with(count: usize, page: u32, total_pages: u32) -> PostsListView {
        PostsListView {
            page: Some(PostPage {
                posts: (0..count)
                    .map(|n| sample_post(&format!("p{}", n), &format!("post-{}", n), "U1"))
                    .collect(),
                pagination: Pagination {
                    total: (total_pages * 10) as u64,
                    page,
                    limit: 10,
                    total_pages,
                },
            }),
            error: None,
        }
    }

    #[test]
    fn test_feed_lists_cards_and_pager() {
        let html = render(&view_with(3, 1, 2), &ListScope::Published, None).into_string();
        assert_eq!(html.matches("class=\"card post-card\"").count(), 3);
        assert!(html.contains("href=\"/posts?page=2\""));
    }

    #[test]
    fn test_my_drafts_keep_filter_in_pager() {
        let scope = ListScope::Mine {
            status: Some(PostStatus::Draft),
        };
        let session = session_for("U1");
        let html = render(&view_with(1, 1, 2), &scope, Some(&session)).into_string();
        assert!(html.contains("/me/posts?status=draft&amp;page=2"));
        assert!(html.contains("href=\"/me/posts?status=draft\" aria-current=\"page\""));
    }

    #[test]
    fn test_filter_tabs_only_on_my_posts() {
        let session = session_for("U1");
        let scope = ListScope::Mine { status: None };
        let html = render(&view_with(1, 1, 1), &scope, Some(&session)).into_string();
        assert!(html.contains("href=\"/me/posts\" aria-current=\"page\""));
        assert!(html.contains("href=\"/me/posts?status=published\""));
        assert!(!html.contains("href=\"/me/posts?status=published\" aria-current"));

        let html = render(&view_with(1, 1, 1), &ListScope::Published, None).into_string();
        assert!(!html.contains("/me/posts?status="));
    }

    #[test]
    fn test_error_and_empty_states() {
        let failed = PostsListView {
            page: None,
            error: Some(LOAD_POSTS_FAILED.to_string()),
        };
        let html = render(&failed, &ListScope::Published, None).into_string();
        assert!(html.contains(LOAD_POSTS_FAILED));
        assert!(!html.contains("No posts yet"));

        let html = render(&view_with(0, 1, 0), &ListScope::Published, None).into_string();
        assert!(html.contains("No posts yet"));
    }
}
