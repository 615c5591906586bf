//! Project session management.
//!
//! Holds the editor-facing session state around the project aggregate and
//! its snapshot persistence.

mod snapshot;
mod state;

pub use snapshot::*;
pub use state::*;
