//! # Views
//!
//! Screen state and orchestration for the rendered pages. Each view owns its
//! local state, talks to the external services through their traits and
//! patches local state after a successful mutation instead of re-fetching.

pub mod create_post;
pub mod post_detail;
pub mod posts_list;
pub mod search;
pub mod welcome;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

pub use create_post::{CreatePostState, CreatePostView, DraftRegistry};
pub use post_detail::{can_delete_comment, PostDetailState, PostDetailView};
pub use posts_list::{ListScope, PostsListView};
pub use search::SearchView;
pub use welcome::WelcomeView;

/// Why a view action did not go through
///
/// The user-facing message (if any) is already stored on the view state;
/// this is what the caller uses to pick a status code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("sign in required")]
    SignInRequired,

    #[error("no post loaded")]
    NotLoaded,

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("action not confirmed")]
    Cancelled,

    #[error("not permitted")]
    NotPermitted,

    #[error("{0}")]
    Failed(String),
}
