//! Storage abstraction the command layer mutates through.

use crate::error::EditorResult;
use crate::timeline::{Clip, Project, Track};
use crate::types::{ClipId, TrackId};

/// Mutation surface that [`crate::EditCommand`] replays against.
///
/// Implementations maintain derived bookkeeping (cached duration, clip
/// track indices, selection hygiene) after every structural change. They
/// do NOT re-validate placement: a replayed command restores state that
/// was already validated when the command was first built, so re-checking
/// would wrongly reject legitimate undos.
pub trait ProjectStore {
    /// Read access to the current project, used by commands to resolve
    /// ids and capture current values during replay.
    fn project(&self) -> &Project;

    /// Replaces the whole project aggregate. Transient view fields
    /// (playhead, zoom, scroll) are carried over from the current state so
    /// undoing a property edit does not yank the viewport around.
    fn update_project(&mut self, project: Project);

    /// Replaces a clip in place (same track) by id.
    fn update_clip(&mut self, clip: Clip) -> EditorResult<()>;

    /// Appends a clip to the given track, keeping the track sorted.
    fn add_clip(&mut self, track_id: &TrackId, clip: Clip) -> EditorResult<()>;

    /// Removes a clip from whichever track holds it, returning the value.
    fn remove_clip(&mut self, clip_id: &ClipId) -> EditorResult<Clip>;

    /// Splices a track in at `index` (clamped to the track count).
    fn add_track(&mut self, track: Track, index: usize);

    /// Removes a track by id, returning the removed value.
    fn remove_track(&mut self, track_id: &TrackId) -> EditorResult<Track>;
}
