//! Landing page

use crate::auth::models::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallToAction {
    /// Signed out: start Google sign-in
    JoinNow,
    /// Signed in: browse the published posts
    ExplorePosts,
}

impl CallToAction {
    pub fn label(&self) -> &'static str {
        match self {
            CallToAction::JoinNow => "Join Now",
            CallToAction::ExplorePosts => "Explore Posts",
        }
    }

    pub fn href(&self) -> &'static str {
        match self {
            CallToAction::JoinNow => "/auth/signin/google",
            CallToAction::ExplorePosts => "/posts",
        }
    }
}

#[derive(Debug, Clone)]
pub struct WelcomeView {
    pub greeting: Option<String>,
    pub call_to_action: CallToAction,
}

impl WelcomeView {
    pub fn for_session(session: Option<&Session>) -> Self {
        match session {
            Some(session) => Self {
                greeting: Some(format!("Welcome back, {}", session.display_name())),
                call_to_action: CallToAction::ExplorePosts,
            },
            None => Self {
                greeting: None,
                call_to_action: CallToAction::JoinNow,
            },
        }
    }
}
