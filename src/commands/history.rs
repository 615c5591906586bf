//! Undo/redo history.
//!
//! Two bounded stacks of executed commands with linear (branch-discarding)
//! semantics: executing a new command clears the redo stack, and the undo
//! stack evicts its oldest entries first once it exceeds the cap.

use std::collections::VecDeque;

use tracing::debug;

use crate::commands::{Direction, EditCommand, ProjectStore};
use crate::error::EditorResult;

/// Default maximum number of undoable commands
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Bounded undo/redo stacks over [`EditCommand`]
#[derive(Clone, Debug)]
pub struct History {
    undo_stack: VecDeque<EditCommand>,
    redo_stack: VecDeque<EditCommand>,
    max_depth: usize,
}

impl History {
    /// Creates a history with the default depth cap
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_HISTORY)
    }

    /// Creates a history with a specific depth cap
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth,
        }
    }

    /// Applies a command forward and records it.
    ///
    /// On success the redo stack is cleared: a new edit makes previously
    /// undone commands unreachable. On failure nothing is recorded.
    pub fn execute(
        &mut self,
        store: &mut dyn ProjectStore,
        command: EditCommand,
    ) -> EditorResult<()> {
        command.apply(store, Direction::Forward)?;

        debug!(command = command.name(), "executed edit");
        self.undo_stack.push_back(command);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();

        Ok(())
    }

    /// Reverses the most recent command. Returns `false` when there is
    /// nothing to undo.
    pub fn undo(&mut self, store: &mut dyn ProjectStore) -> EditorResult<bool> {
        let Some(command) = self.undo_stack.pop_back() else {
            return Ok(false);
        };

        if let Err(err) = command.apply(store, Direction::Reverse) {
            // Keep the stacks consistent with the (unchanged) state.
            self.undo_stack.push_back(command);
            return Err(err);
        }

        debug!(command = command.name(), "undid edit");
        self.redo_stack.push_back(command);
        Ok(true)
    }

    /// Re-applies the most recently undone command. Returns `false` when
    /// there is nothing to redo.
    pub fn redo(&mut self, store: &mut dyn ProjectStore) -> EditorResult<bool> {
        let Some(command) = self.redo_stack.pop_back() else {
            return Ok(false);
        };

        if let Err(err) = command.apply(store, Direction::Forward) {
            self.redo_stack.push_back(command);
            return Err(err);
        }

        debug!(command = command.name(), "redid edit");
        self.undo_stack.push_back(command);
        Ok(true)
    }

    /// Returns true if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of commands on the undo stack
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of commands on the redo stack
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Empties both stacks (e.g. on project load)
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Updates the depth cap, immediately evicting the oldest entries if
    /// the undo stack now exceeds it.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::EditorState;
    use crate::timeline::{Clip, ClipKind, Project, ProjectSettings, Track, TrackKind};
    use crate::types::{Time, TrackId};

    fn state_with_track() -> (EditorState, TrackId) {
        let mut project = Project::new("Test", ProjectSettings::default());
        let track = Track::new("Video 1", TrackKind::Video);
        let track_id = track.id.clone();
        project.tracks.push(track);
        project.refresh();
        (EditorState::new(project), track_id)
    }

    fn add_clip_command(track_id: &TrackId, start_sec: i64) -> EditCommand {
        EditCommand::AddClip {
            track_id: track_id.clone(),
            clip: Clip::new(
                ClipKind::Video,
                "clip",
                "/media/clip.mp4",
                Time::from_seconds(1),
            )
            .place_at(Time::from_seconds(start_sec)),
        }
    }

    #[test]
    fn test_execute_undo_redo() {
        let (mut state, track_id) = state_with_track();
        let mut history = History::new();

        history
            .execute(&mut state, add_clip_command(&track_id, 0))
            .unwrap();
        assert_eq!(state.project.tracks[0].clips.len(), 1);
        assert!(history.can_undo());
        assert!(!history.can_redo());

        assert!(history.undo(&mut state).unwrap());
        assert!(state.project.tracks[0].clips.is_empty());
        assert!(!history.can_undo());
        assert!(history.can_redo());

        assert!(history.redo(&mut state).unwrap());
        assert_eq!(state.project.tracks[0].clips.len(), 1);
    }

    #[test]
    fn test_undo_empty_is_noop() {
        let (mut state, _) = state_with_track();
        let mut history = History::new();

        assert!(!history.undo(&mut state).unwrap());
        assert!(!history.redo(&mut state).unwrap());
    }

    #[test]
    fn test_execute_clears_redo() {
        let (mut state, track_id) = state_with_track();
        let mut history = History::new();

        history
            .execute(&mut state, add_clip_command(&track_id, 0))
            .unwrap();
        history.undo(&mut state).unwrap();
        assert!(history.can_redo());

        // A new edit discards the undone branch.
        history
            .execute(&mut state, add_clip_command(&track_id, 10))
            .unwrap();
        assert!(!history.can_redo());
        assert_eq!(history.redo_count(), 0);
    }

    #[test]
    fn test_history_cap_evicts_oldest() {
        let (mut state, track_id) = state_with_track();
        let mut history = History::with_max_depth(100);

        for i in 0..105 {
            history
                .execute(&mut state, add_clip_command(&track_id, i * 10))
                .unwrap();
        }

        assert_eq!(history.undo_count(), 100);

        // Unwinding the whole history leaves the 5 evicted edits applied.
        while history.undo(&mut state).unwrap() {}
        assert_eq!(state.project.tracks[0].clips.len(), 5);
        assert_eq!(
            state.project.tracks[0].clips[0].timeline_start,
            Time::ZERO
        );
    }

    #[test]
    fn test_set_max_depth_truncates_front() {
        let (mut state, track_id) = state_with_track();
        let mut history = History::new();

        for i in 0..10 {
            history
                .execute(&mut state, add_clip_command(&track_id, i * 10))
                .unwrap();
        }

        history.set_max_depth(3);
        assert_eq!(history.undo_count(), 3);

        // The three remaining entries are the newest ones.
        while history.undo(&mut state).unwrap() {}
        assert_eq!(state.project.tracks[0].clips.len(), 7);
    }

    #[test]
    fn test_clear() {
        let (mut state, track_id) = state_with_track();
        let mut history = History::new();

        history
            .execute(&mut state, add_clip_command(&track_id, 0))
            .unwrap();
        history.undo(&mut state).unwrap();
        history
            .execute(&mut state, add_clip_command(&track_id, 10))
            .unwrap();

        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_failed_execute_records_nothing() {
        let (mut state, _) = state_with_track();
        let mut history = History::new();

        let command = EditCommand::AddClip {
            track_id: "missing".to_string(),
            clip: Clip::new(
                ClipKind::Video,
                "clip",
                "/media/clip.mp4",
                Time::from_seconds(1),
            ),
        };

        assert!(history.execute(&mut state, command).is_err());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_failed_undo_keeps_command() {
        let (mut state, track_id) = state_with_track();
        let mut history = History::new();

        history
            .execute(&mut state, add_clip_command(&track_id, 0))
            .unwrap();

        // Remove the clip behind the history's back; the undo replay can no
        // longer find it.
        state.project.tracks[0].clips.clear();
        state.project.refresh();

        assert!(history.undo(&mut state).is_err());
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 0);
    }

    #[test]
    fn test_multiple_undo_redo_cycle() {
        let (mut state, track_id) = state_with_track();
        let mut history = History::new();

        for i in 0..3 {
            history
                .execute(&mut state, add_clip_command(&track_id, i * 10))
                .unwrap();
        }
        assert_eq!(state.project.tracks[0].clips.len(), 3);

        history.undo(&mut state).unwrap();
        history.undo(&mut state).unwrap();
        history.undo(&mut state).unwrap();
        assert!(state.project.tracks[0].clips.is_empty());

        history.redo(&mut state).unwrap();
        history.redo(&mut state).unwrap();
        history.redo(&mut state).unwrap();
        assert_eq!(state.project.tracks[0].clips.len(), 3);

        assert_eq!(history.undo_count(), 3);
        assert_eq!(history.redo_count(), 0);
    }
}
