// src/posts/validators.rs

use super::models::NewPost;
use crate::common::{ValidationResult, Validator};

pub const TITLE_AND_CONTENT_REQUIRED: &str = "Title and content are required";

const MAX_TITLE_LENGTH: usize = 255;

// ============================================================================
// Post Validators
// ============================================================================

pub struct NewPostValidator;

impl Validator<NewPost> for NewPostValidator {
    fn validate(&self, data: &NewPost) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.title.trim().is_empty() || data.content.trim().is_empty() {
            result.add_error("title", TITLE_AND_CONTENT_REQUIRED);
            return result;
        }

        if data.title.trim().chars().count() > MAX_TITLE_LENGTH {
            result.add_error("title", "Title must be less than 255 characters");
        }

        if let Some(cover) = &data.cover_image {
            if !crate::common::helpers::is_safe_url(cover) {
                result.add_error("cover_image", "Cover image must be an http(s) URL");
            }
        }

        result
    }
}

// ============================================================================
// Comment Validators
// ============================================================================

pub struct CommentValidator;

impl Validator<str> for CommentValidator {
    fn validate(&self, content: &str) -> ValidationResult {
        let mut result = ValidationResult::new();

        if content.trim().is_empty() {
            result.add_error("content", "Comment content is required");
        }

        result
    }
}
