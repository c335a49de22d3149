// Error handling types for the rendered pages

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use std::fmt;
use tracing::{error, warn};

use super::validation::ValidationResult;
use crate::auth::session_cookie::SessionError;
use crate::render::error::error_page;
use crate::views::post_detail::POST_NOT_FOUND;
use crate::views::ViewError;

/// Page-level error types
#[derive(Debug)]
pub enum AppError {
    /// No session on a page that needs one; answered with a redirect home
    SignInRequired,
    Forbidden(String),
    BadRequest(String),
    NotFound(String),
    ValidationError(String),
    /// The Postly API or another upstream service failed
    Upstream(String),
    InternalServer(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::SignInRequired => write!(f, "Sign in required"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Upstream(msg) => write!(f, "Upstream Error: {}", msg),
            AppError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::SignInRequired => StatusCode::SEE_OTHER,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalServer(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::SignInRequired => return Redirect::to("/").into_response(),
            AppError::InternalServer(msg) => {
                error!(error = %msg, "Internal error while rendering page");
                "Something went wrong. Please try again.".to_string()
            }
            AppError::Upstream(msg) => {
                warn!(error = %msg, "Upstream service failed");
                msg
            }
            AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => msg,
        };

        (status, error_page(status, &message, None)).into_response()
    }
}

/// Helper function to convert ValidationResult to AppError
impl From<ValidationResult> for AppError {
    fn from(result: ValidationResult) -> Self {
        if result.is_valid {
            AppError::InternalServer(
                "Validation result was valid but converted to error".to_string(),
            )
        } else {
            let error_messages: Vec<String> = result
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            AppError::ValidationError(error_messages.join(", "))
        }
    }
}

impl From<ViewError> for AppError {
    fn from(err: ViewError) -> Self {
        match err {
            ViewError::SignInRequired => AppError::SignInRequired,
            ViewError::NotLoaded => AppError::NotFound(POST_NOT_FOUND.to_string()),
            ViewError::Invalid(msg) => AppError::ValidationError(msg),
            ViewError::Cancelled => AppError::BadRequest("Action was not confirmed".to_string()),
            ViewError::NotPermitted => {
                AppError::Forbidden("You are not allowed to do that".to_string())
            }
            ViewError::Failed(msg) => AppError::Upstream(msg),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::InternalServer(err.to_string())
    }
}
