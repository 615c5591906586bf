//! Shotline — non-linear editing timeline engine.
//!
//! The crate models a video editing project as an aggregate of typed
//! tracks holding non-overlapping clips, with derived bookkeeping (total
//! duration, clip track indices) recomputed after every structural change.
//! All editing goes through [`Editor`]: each mutation is validated against
//! the current state, captured as a reversible [`EditCommand`], and
//! replayed through the bounded undo/redo [`History`]. Commands mutate
//! state only via the [`ProjectStore`] abstraction, keeping the command
//! layer independent of how state is held.
//!
//! Everything runs synchronously under a single owner; observers never see
//! a partially applied mutation, and rejected requests leave state
//! untouched. Rendering, media probing, and transport to external
//! processes are out of scope — clips reference source media by path and
//! carry the probed duration they were constructed with.

pub mod commands;
pub mod project;
pub mod timeline;

mod editor;
pub use editor::*;

mod types;
pub use types::*;

mod error;
pub use error::*;

pub use commands::{ClipSpot, ClipTrim, Direction, EditCommand, History, ProjectStore};
pub use project::{EditorState, PlaybackState, Snapshot};
pub use timeline::{Canvas, Clip, ClipKind, Project, ProjectSettings, Track, TrackKind};
