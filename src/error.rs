//! Error definitions.
//!
//! Routine invalid input (overlaps, bounds, duration floors) is reported via
//! `bool` returns on [`crate::Editor`] and never reaches this type. The
//! variants here cover command replay against state the history no longer
//! matches, plus snapshot I/O.

use thiserror::Error;

use crate::types::{ClipId, TrackId};

/// Editing engine error types
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Clip not found: {0}")]
    ClipNotFound(ClipId),

    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    #[error("Track index out of bounds: {0}")]
    TrackIndexOutOfBounds(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Editing engine result type
pub type EditorResult<T> = Result<T, EditorError>;
