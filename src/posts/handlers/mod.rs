// src/posts/handlers/mod.rs

pub mod compose;
pub mod interactions;
pub mod public;

pub use compose::*;
pub use interactions::*;
pub use public::*;
