//! Landing page

use maud::{html, Markup};

use super::components::page_shell;
use crate::auth::models::Session;
use crate::views::WelcomeView;

pub fn render(view: &WelcomeView, session: Option<&Session>) -> Markup {
    let body = html! {
        section class="hero" {
            h1 { "Welcome to Postly" }
            p { "Share your ideas, read what others write and join the conversation." }
            @if let Some(greeting) = &view.greeting {
                p { strong { (greeting) } }
            }
        }
        section class="features" {
            div class="card" {
                h3 { "Write Posts" }
                p { "Compose in Markdown and pick a cover image suggested from your title." }
            }
            div class="card" {
                h3 { "Explore Conversations" }
                p { "Comment on posts and see what the community is talking about." }
            }
            div class="card" {
                h3 { "Show Appreciation" }
                p { "Like the posts you enjoy so their authors know." }
            }
        }
        section class="hero" {
            a class="btn" href=(view.call_to_action.href()) { (view.call_to_action.label()) }
        }
    };

    page_shell("Welcome", session, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::session_for;

    #[test]
    fn test_signed_out_landing_offers_join() {
        let html = render(&WelcomeView::for_session(None), None).into_string();
        assert!(html.contains("Join Now"));
        assert!(html.contains("href=\"/auth/signin/google\""));
    }

    #[test]
    fn test_signed_in_landing_offers_posts() {
        let session = session_for("U1");
        let html = render(&WelcomeView::for_session(Some(&session)), Some(&session)).into_string();
        assert!(html.contains("Explore Posts"));
        assert!(!html.contains("Join Now"));
    }
}
