// Common module - shared types and utilities across all modules

pub mod config;
pub mod debounce;
pub mod error;
pub mod helpers;
pub mod state;
pub mod validation;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
pub use validation::{ValidationResult, Validator};
