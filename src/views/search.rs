//! Search results screen

use std::sync::Arc;
use tracing::{debug, error};

use crate::posts::models::Post;
use crate::services::api::PostApi;

pub const SEARCH_FAILED: &str = "Error searching. Try it again.";
pub const NO_RESULTS: &str = "No results were found";

#[derive(Debug, Clone, Default)]
pub struct SearchView {
    pub query: String,
    pub posts: Vec<Post>,
    pub error: Option<String>,
}

impl SearchView {
    /// Runs the search for `query`; a blank query issues no request
    pub async fn run(posts: &Arc<dyn PostApi>, query: &str) -> Self {
        let mut view = Self {
            query: query.trim().to_string(),
            ..Default::default()
        };
        if view.query.is_empty() {
            return view;
        }

        match posts.search_posts(&view.query).await {
            Ok(results) => {
                debug!(query = %view.query, count = results.len(), "Search completed");
                view.posts = results;
            }
            Err(e) => {
                error!(error = %e, query = %view.query, "Error searching posts");
                view.error = Some(SEARCH_FAILED.to_string());
            }
        }
        view
    }

    pub fn has_query(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn is_empty_result(&self) -> bool {
        self.has_query() && self.error.is_none() && self.posts.is_empty()
    }

    pub fn summary(&self) -> Option<String> {
        match self.posts.len() {
            0 => None,
            count => Some(format!("{} result(s) were found.", count)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{sample_post, FakePostApi};

    fn api(fake: FakePostApi) -> (Arc<FakePostApi>, Arc<dyn PostApi>) {
        let fake = Arc::new(fake);
        let api: Arc<dyn PostApi> = fake.clone();
        (fake, api)
    }

    #[tokio::test]
    async fn test_blank_query_issues_no_request() {
        let (fake, api) = api(FakePostApi::default());
        let view = SearchView::run(&api, "   ").await;
        assert!(!view.has_query());
        assert!(!view.is_empty_result());
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_results_and_summary() {
        let (_, api) = api(FakePostApi::with_posts(vec![
            sample_post("p1", "rust-tips", "U1"),
            sample_post("p2", "cooking", "U2"),
        ]));
        let view = SearchView::run(&api, "rust").await;
        assert_eq!(view.posts.len(), 1);
        assert_eq!(view.summary().as_deref(), Some("1 result(s) were found."));
    }

    #[tokio::test]
    async fn test_empty_and_failed_search() {
        let (fake, api) = api(FakePostApi::default());
        let view = SearchView::run(&api, "nothing").await;
        assert!(view.is_empty_result());
        assert!(view.summary().is_none());

        fake.fail("search_posts");
        let view = SearchView::run(&api, "nothing").await;
        assert_eq!(view.error.as_deref(), Some(SEARCH_FAILED));
        assert!(!view.is_empty_result());
    }
}
