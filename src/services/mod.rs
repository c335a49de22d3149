// src/services/mod.rs
//
// Clients for the external collaborators: the Postly REST API, Google OAuth
// and the Pexels image search

pub mod api;
pub mod google;
pub mod pexels;

// Re-export commonly used types for convenience
pub use api::{ApiClient, AuthService, CommentApi, CommentService, PostApi, PostService};
pub use google::GoogleService;
pub use pexels::{ImageSearch, PexelsService};
