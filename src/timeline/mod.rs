//! Timeline data model.
//!
//! Defines the project aggregate, its tracks, and the clips placed on them.

mod models;

pub use models::*;
