//! HTML rendering for the Postly pages.
//!
//! All rendering uses [maud](https://maud.lambda.xyz/) for compile-time HTML
//! generation; dynamic values are escaped. Post bodies are Markdown rendered
//! through pulldown-cmark.

pub mod auth;
pub mod components;
pub mod compose;
pub mod error;
pub mod listing;
pub mod post;
pub mod search;
pub mod welcome;
