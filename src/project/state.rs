//! Editor session state.
//!
//! [`EditorState`] wraps the project aggregate with the UI-facing pieces
//! that are not part of the persisted document: selection, playback
//! transport, and the dirty flag. It is also the concrete [`ProjectStore`]
//! the command layer replays against.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::commands::ProjectStore;
use crate::error::{EditorError, EditorResult};
use crate::timeline::{Clip, Project, Track};
use crate::types::{ClipId, TrackId};

// =============================================================================
// Playback State
// =============================================================================

/// Playback transport state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

// =============================================================================
// Editor State
// =============================================================================

/// Session state: the project plus selection, playback, and dirty tracking.
///
/// Mutations happen under a single `&mut` owner, so no observer can ever
/// see a partially applied change; rejected mutations are validated before
/// anything is written and leave the previous value untouched.
#[derive(Clone, Debug)]
pub struct EditorState {
    pub project: Project,
    pub selected_clip_ids: HashSet<ClipId>,
    pub playback: PlaybackState,
    pub is_dirty: bool,
}

impl EditorState {
    /// Creates a fresh session around a project, with derived bookkeeping
    /// re-established.
    pub fn new(mut project: Project) -> Self {
        project.refresh();
        Self {
            project,
            selected_clip_ids: HashSet::new(),
            playback: PlaybackState::Stopped,
            is_dirty: false,
        }
    }

    /// Returns the currently selected clips
    pub fn selected_clips(&self) -> Vec<&Clip> {
        self.project
            .clips()
            .filter(|clip| self.selected_clip_ids.contains(&clip.id))
            .collect()
    }
}

impl ProjectStore for EditorState {
    fn project(&self) -> &Project {
        &self.project
    }

    fn update_project(&mut self, mut project: Project) {
        // Transient view state stays with the session, not the edit.
        project.playhead = self.project.playhead;
        project.zoom_level = self.project.zoom_level;
        project.scroll_offset = self.project.scroll_offset;
        project.refresh();
        self.project = project;

        let project = &self.project;
        self.selected_clip_ids
            .retain(|id| project.find_clip(id).is_some());
        self.is_dirty = true;
    }

    fn update_clip(&mut self, clip: Clip) -> EditorResult<()> {
        let track_index = self
            .project
            .find_clip(&clip.id)
            .map(|(index, _)| index)
            .ok_or_else(|| EditorError::ClipNotFound(clip.id.clone()))?;

        let track = &mut self.project.tracks[track_index];
        if let Some(slot) = track.clips.iter_mut().find(|c| c.id == clip.id) {
            *slot = clip;
        }
        // The start may have changed.
        track.sort_clips();

        self.project.refresh();
        self.is_dirty = true;
        Ok(())
    }

    fn add_clip(&mut self, track_id: &TrackId, clip: Clip) -> EditorResult<()> {
        let index = self
            .project
            .track_index(track_id)
            .ok_or_else(|| EditorError::TrackNotFound(track_id.clone()))?;

        self.project.tracks[index].insert_clip(clip);
        self.project.refresh();
        self.is_dirty = true;
        Ok(())
    }

    fn remove_clip(&mut self, clip_id: &ClipId) -> EditorResult<Clip> {
        let removed = self
            .project
            .tracks
            .iter_mut()
            .find_map(|track| track.remove_clip(clip_id));

        let Some(clip) = removed else {
            return Err(EditorError::ClipNotFound(clip_id.clone()));
        };

        // Selection is not touched here: a move replays as remove + add and
        // must keep the clip selected. Deletion prunes at the editor level.
        self.project.refresh();
        self.is_dirty = true;
        Ok(clip)
    }

    fn add_track(&mut self, track: Track, index: usize) {
        let index = index.min(self.project.tracks.len());
        self.project.tracks.insert(index, track);
        self.project.refresh();
        self.is_dirty = true;
    }

    fn remove_track(&mut self, track_id: &TrackId) -> EditorResult<Track> {
        let position = self
            .project
            .track_index(track_id)
            .ok_or_else(|| EditorError::TrackNotFound(track_id.clone()))?;

        let track = self.project.tracks.remove(position);
        for clip in &track.clips {
            self.selected_clip_ids.remove(&clip.id);
        }
        self.project.refresh();
        self.is_dirty = true;
        Ok(track)
    }
}

// =============================================================================
// Tests
// =============================================================================
