//! Editing facade.
//!
//! [`Editor`] is the single mutation surface over the session state. Every
//! structural change is validated against the current project first, then
//! captured as an [`EditCommand`] and replayed through the [`History`], so
//! undo/redo covers the whole editing surface uniformly. Rejected requests
//! return `false` and leave the state untouched.
//!
//! Selection, playhead, zoom, scroll, and playback are transient view
//! state: they mutate directly and never enter the history.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::commands::{ClipSpot, ClipTrim, EditCommand, History};
use crate::error::EditorResult;
use crate::project::{EditorState, PlaybackState, Snapshot};
use crate::timeline::{Clip, Project, Track, TrackKind};
use crate::types::{ClipId, Time, TimeRange, TrackId};

/// Minimum clip duration: one frame at 30 fps.
pub const MIN_CLIP_DURATION: Time = Time::from_millis(33);

/// Zoom bounds in pixels per second.
pub const MIN_ZOOM: f64 = 10.0;
pub const MAX_ZOOM: f64 = 1000.0;

/// Multiplicative step for zoom in/out.
const ZOOM_STEP: f64 = 1.25;

/// The editing engine: session state plus undo/redo history.
#[derive(Debug)]
pub struct Editor {
    state: EditorState,
    history: History,
}

impl Editor {
    /// Creates an editor around a project with empty history.
    pub fn new(project: Project) -> Self {
        Self {
            state: EditorState::new(project),
            history: History::new(),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn project(&self) -> &Project {
        &self.state.project
    }

    pub fn selected_clip_ids(&self) -> &HashSet<ClipId> {
        &self.state.selected_clip_ids
    }

    pub fn playback(&self) -> PlaybackState {
        self.state.playback
    }

    pub fn is_dirty(&self) -> bool {
        self.state.is_dirty
    }

    /// Validated commands are not expected to fail on replay; a failure
    /// here means the history and the state disagree, which is reported
    /// and surfaced as a rejected edit.
    fn push(&mut self, command: EditCommand) -> bool {
        match self.history.execute(&mut self.state, command) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "edit command failed");
                false
            }
        }
    }

    // =========================================================================
    // Tracks
    // =========================================================================

    /// Adds a track of the given kind, named `"<Label> <N>"` after the
    /// existing tracks of that kind.
    ///
    /// Video tracks go right after the last video track so the video group
    /// stays together at the top; audio tracks go to the very end; text and
    /// effect tracks sit between the two groups.
    pub fn add_track(&mut self, kind: TrackKind) -> TrackId {
        let count = self
            .state
            .project
            .tracks
            .iter()
            .filter(|t| t.kind == kind)
            .count();
        let name = format!("{} {}", kind.label(), count + 1);
        let track = Track::new(&name, kind);
        let track_id = track.id.clone();
        let index = self.track_insert_index(kind);

        self.push(EditCommand::AddTrack { track, index });
        track_id
    }

    fn track_insert_index(&self, kind: TrackKind) -> usize {
        let tracks = &self.state.project.tracks;
        match kind {
            TrackKind::Audio => tracks.len(),
            TrackKind::Video | TrackKind::Text | TrackKind::Effect => tracks
                .iter()
                .rposition(|t| t.kind == TrackKind::Video)
                .map(|index| index + 1)
                .unwrap_or(0),
        }
    }

    /// Removes a track and everything on it. Returns `false` for an
    /// unknown id.
    pub fn remove_track(&mut self, track_id: &TrackId) -> bool {
        let Some(index) = self.state.project.track_index(track_id) else {
            return false;
        };
        let track = self.state.project.tracks[index].clone();
        self.push(EditCommand::RemoveTrack { track, index })
    }

    /// Renames a track. Returns `false` for an unknown id.
    pub fn rename_track(&mut self, track_id: &TrackId, name: &str) -> bool {
        self.update_track(track_id, |track| track.name = name.to_string())
    }

    /// Generic track property edit (name, muted, locked, visible).
    ///
    /// The edit must not touch the track's id or clip list; structural
    /// changes go through the clip operations so their validation cannot
    /// be bypassed.
    pub fn update_track(&mut self, track_id: &TrackId, edit: impl FnOnce(&mut Track)) -> bool {
        let Some(index) = self.state.project.track_index(track_id) else {
            return false;
        };

        let before = self.state.project.clone();
        let mut after = before.clone();
        edit(&mut after.tracks[index]);

        if after.tracks[index].id != before.tracks[index].id
            || after.tracks[index].clips != before.tracks[index].clips
        {
            warn!("update_track: structural edits must go through clip operations");
            return false;
        }
        if after == before {
            return true;
        }

        self.push(EditCommand::UpdateProject {
            before: Box::new(before),
            after: Box::new(after),
        })
    }

    // =========================================================================
    // Clips
    // =========================================================================

    /// Adds a clip to a track. Rejects unknown tracks, invalid clip
    /// geometry, and placements that would overlap an existing clip.
    pub fn add_clip(&mut self, track_id: &TrackId, mut clip: Clip) -> bool {
        let Some(index) = self.state.project.track_index(track_id) else {
            warn!("add_clip: unknown track");
            return false;
        };
        if clip.duration <= Time::ZERO
            || clip.duration > clip.source_duration
            || clip.timeline_start.is_negative()
            || clip.source_start.is_negative()
        {
            warn!(clip = %clip.id, "add_clip: invalid clip geometry");
            return false;
        }

        clip.track_index = index;
        if self.state.project.tracks[index]
            .overlapping_clip(&clip.timeline_range(), None)
            .is_some()
        {
            debug!(clip = %clip.id, "add_clip: placement overlaps existing clip");
            return false;
        }

        self.push(EditCommand::AddClip {
            track_id: track_id.clone(),
            clip,
        })
    }

    /// Removes a clip from whichever track holds it and drops it from the
    /// selection. Returns `false` when the id is unknown.
    pub fn remove_clip(&mut self, clip_id: &ClipId) -> bool {
        let Some((track_index, clip)) = self.state.project.find_clip(clip_id) else {
            return false;
        };
        let track_id = self.state.project.tracks[track_index].id.clone();
        let clip = clip.clone();

        if !self.push(EditCommand::RemoveClip { track_id, clip }) {
            return false;
        }
        self.state.selected_clip_ids.remove(clip_id);
        true
    }

    /// Moves a clip to a new start position, optionally onto another track.
    ///
    /// The start is clamped to zero; the move is rejected if the target
    /// track index is out of bounds or the clip would overlap anything on
    /// the target track.
    pub fn move_clip(
        &mut self,
        clip_id: &ClipId,
        new_start: Time,
        new_track_index: Option<usize>,
    ) -> bool {
        let project = &self.state.project;
        let Some((current_index, clip)) = project.find_clip(clip_id) else {
            return false;
        };

        let target_index = new_track_index.unwrap_or(current_index);
        if target_index >= project.tracks.len() {
            warn!(target_index, "move_clip: track index out of bounds");
            return false;
        }

        let start = new_start.max(Time::ZERO);
        let candidate = TimeRange::new(start, clip.duration);
        let ignore = (target_index == current_index).then(|| clip.id.as_str());
        if project.tracks[target_index]
            .overlapping_clip(&candidate, ignore)
            .is_some()
        {
            debug!(clip = %clip_id, "move_clip: target placement overlaps");
            return false;
        }

        let command = EditCommand::MoveClip {
            clip_id: clip_id.clone(),
            from: ClipSpot {
                track_index: current_index,
                start: clip.timeline_start,
            },
            to: ClipSpot {
                track_index: target_index,
                start,
            },
        };
        self.push(command)
    }

    /// Resizes a clip to a new duration.
    ///
    /// The duration is floored at [`MIN_CLIP_DURATION`] (rejected below it)
    /// and clamped down to the source duration. With `from_start` the trim
    /// delta shifts the timeline start and source offset together, keeping
    /// the clip's end fixed; the resize is rejected if either would go
    /// negative, or if the result overlaps a neighbor.
    pub fn resize_clip(&mut self, clip_id: &ClipId, new_duration: Time, from_start: bool) -> bool {
        let project = &self.state.project;
        let Some((track_index, clip)) = project.find_clip(clip_id) else {
            return false;
        };

        if new_duration < MIN_CLIP_DURATION {
            debug!(clip = %clip_id, %new_duration, "resize_clip: below minimum duration");
            return false;
        }
        let new_duration = new_duration.min(clip.source_duration);

        let (timeline_start, source_start) = if from_start {
            let delta = clip.duration - new_duration;
            let timeline_start = clip.timeline_start + delta;
            let source_start = clip.source_start + delta;
            if timeline_start.is_negative() || source_start.is_negative() {
                debug!(clip = %clip_id, "resize_clip: trim would run past the clip head");
                return false;
            }
            (timeline_start, source_start)
        } else {
            (clip.timeline_start, clip.source_start)
        };

        let candidate = TimeRange::new(timeline_start, new_duration);
        if project.tracks[track_index]
            .overlapping_clip(&candidate, Some(clip.id.as_str()))
            .is_some()
        {
            debug!(clip = %clip_id, "resize_clip: resized range overlaps");
            return false;
        }

        let command = EditCommand::ResizeClip {
            clip_id: clip_id.clone(),
            from: ClipTrim::of(clip),
            to: ClipTrim {
                timeline_start,
                duration: new_duration,
                source_start,
            },
        };
        self.push(command)
    }

    /// Generic clip property edit (name, source path, media metadata).
    ///
    /// Placement fields (start, duration, track) must go through
    /// [`Editor::move_clip`]/[`Editor::resize_clip`] so their validation
    /// cannot be bypassed.
    pub fn update_clip(&mut self, clip_id: &ClipId, edit: impl FnOnce(&mut Clip)) -> bool {
        let Some((_, clip)) = self.state.project.find_clip(clip_id) else {
            return false;
        };
        let before = clip.clone();
        let mut after = before.clone();
        edit(&mut after);

        if after.id != before.id
            || after.timeline_start != before.timeline_start
            || after.duration != before.duration
            || after.track_index != before.track_index
        {
            warn!(clip = %clip_id, "update_clip: placement edits must go through move/resize");
            return false;
        }
        if after == before {
            return true;
        }

        self.push(EditCommand::UpdateClip { before, after })
    }

    /// Splits a clip at a timeline position, producing a second clip that
    /// continues from the matching source offset. Both halves must meet
    /// the minimum duration. Returns the new clip's id, or `None` if the
    /// split point is invalid.
    ///
    /// Undo removes the right half and restores the original duration in
    /// one step.
    pub fn split_clip(&mut self, clip_id: &ClipId, at: Time) -> Option<ClipId> {
        let project = &self.state.project;
        let (track_index, clip) = project.find_clip(clip_id)?;

        let offset = at - clip.timeline_start;
        if offset < MIN_CLIP_DURATION || clip.duration - offset < MIN_CLIP_DURATION {
            debug!(clip = %clip_id, "split_clip: split point too close to a clip edge");
            return None;
        }

        let track_id = project.tracks[track_index].id.clone();
        let mut right = clip.clone();
        right.id = ulid::Ulid::new().to_string();
        right.timeline_start = at;
        right.duration = clip.duration - offset;
        right.source_start = clip.source_start + offset;
        let right_id = right.id.clone();

        // Shrink the left half before inserting the right one so the track
        // never holds an overlapping pair, even transiently.
        let command = EditCommand::Composite {
            commands: vec![
                EditCommand::ResizeClip {
                    clip_id: clip_id.clone(),
                    from: ClipTrim::of(clip),
                    to: ClipTrim {
                        timeline_start: clip.timeline_start,
                        duration: offset,
                        source_start: clip.source_start,
                    },
                },
                EditCommand::AddClip {
                    track_id,
                    clip: right,
                },
            ],
        };

        self.push(command).then_some(right_id)
    }

    // =========================================================================
    // Undo / Redo
    // =========================================================================

    /// Reverses the most recent edit. Returns `false` when the history is
    /// empty or the replay no longer matches the state.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&mut self.state) {
            Ok(applied) => applied,
            Err(err) => {
                warn!(%err, "undo failed");
                false
            }
        }
    }

    /// Re-applies the most recently undone edit.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&mut self.state) {
            Ok(applied) => applied,
            Err(err) => {
                warn!(%err, "redo failed");
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_count(&self) -> usize {
        self.history.undo_count()
    }

    pub fn redo_count(&self) -> usize {
        self.history.redo_count()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn set_max_history(&mut self, max_depth: usize) {
        self.history.set_max_depth(max_depth);
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Selects a clip. Additive selection (shift-click) toggles the clip's
    /// membership; plain selection replaces the set.
    pub fn select_clip(&mut self, clip_id: &ClipId, additive: bool) {
        if self.state.project.find_clip(clip_id).is_none() {
            return;
        }
        if additive {
            if !self.state.selected_clip_ids.remove(clip_id) {
                self.state.selected_clip_ids.insert(clip_id.clone());
            }
        } else {
            self.state.selected_clip_ids.clear();
            self.state.selected_clip_ids.insert(clip_id.clone());
        }
    }

    /// Replaces the selection with the given ids (unknown ids are dropped).
    pub fn select_clips(&mut self, clip_ids: impl IntoIterator<Item = ClipId>) {
        let project = &self.state.project;
        self.state.selected_clip_ids = clip_ids
            .into_iter()
            .filter(|id| project.find_clip(id).is_some())
            .collect();
    }

    /// Replaces the selection with every clip whose range overlaps `range`.
    pub fn select_clips_in_range(&mut self, range: TimeRange) {
        self.state.selected_clip_ids = self
            .state
            .project
            .clips()
            .filter(|clip| clip.timeline_range().overlaps(&range))
            .map(|clip| clip.id.clone())
            .collect();
    }

    pub fn clear_selection(&mut self) {
        self.state.selected_clip_ids.clear();
    }

    // =========================================================================
    // Playhead
    // =========================================================================

    /// Moves the playhead, clamped to the project duration.
    pub fn set_playhead(&mut self, position: Time) {
        let duration = self.state.project.duration;
        self.state.project.playhead = position.clamp(Time::ZERO, duration);
    }

    /// Moves the playhead by a signed delta.
    pub fn move_playhead(&mut self, delta: Time) {
        let position = self.state.project.playhead + delta;
        self.set_playhead(position);
    }

    /// Jumps to the nearest clip boundary strictly after the playhead.
    /// Returns `false` when there is none.
    pub fn jump_to_next_clip(&mut self) -> bool {
        let playhead = self.state.project.playhead;
        let next = self
            .state
            .project
            .clips()
            .flat_map(|clip| [clip.timeline_start, clip.timeline_end()])
            .filter(|boundary| *boundary > playhead)
            .min();

        match next {
            Some(boundary) => {
                self.state.project.playhead = boundary;
                true
            }
            None => false,
        }
    }

    /// Jumps to the nearest clip boundary strictly before the playhead.
    pub fn jump_to_previous_clip(&mut self) -> bool {
        let playhead = self.state.project.playhead;
        let previous = self
            .state
            .project
            .clips()
            .flat_map(|clip| [clip.timeline_start, clip.timeline_end()])
            .filter(|boundary| *boundary < playhead)
            .max();

        match previous {
            Some(boundary) => {
                self.state.project.playhead = boundary;
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Zoom / Scroll
    // =========================================================================

    /// Sets the timeline zoom, clamped to [`MIN_ZOOM`]..=[`MAX_ZOOM`]
    /// pixels per second.
    pub fn set_zoom(&mut self, pixels_per_second: f64) {
        self.state.project.zoom_level = pixels_per_second.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.state.project.zoom_level * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.state.project.zoom_level / ZOOM_STEP);
    }

    /// Derives the zoom so the whole project fits the given pixel width.
    /// No-op for an empty project or a degenerate width.
    pub fn zoom_to_fit(&mut self, available_width_px: f64) {
        let seconds = self.state.project.duration.as_seconds_f64();
        if seconds <= 0.0 || available_width_px <= 0.0 {
            return;
        }
        self.set_zoom(available_width_px / seconds);
    }

    /// Sets the horizontal scroll offset, clamped to zero.
    pub fn set_scroll(&mut self, offset_px: f64) {
        self.state.project.scroll_offset = offset_px.max(0.0);
    }

    // =========================================================================
    // Playback
    // =========================================================================

    pub fn play(&mut self) {
        self.state.playback = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state.playback == PlaybackState::Playing {
            self.state.playback = PlaybackState::Paused;
        }
    }

    /// Stops playback and resets the playhead to the in point (or zero).
    pub fn stop(&mut self) {
        self.state.playback = PlaybackState::Stopped;
        let home = self.state.project.in_point.unwrap_or(Time::ZERO);
        self.set_playhead(home);
    }

    pub fn toggle_playback(&mut self) {
        match self.state.playback {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Stopped | PlaybackState::Paused => self.play(),
        }
    }

    // =========================================================================
    // In / Out Points
    // =========================================================================

    pub fn set_in_point(&mut self, position: Option<Time>) {
        self.state.project.in_point = position;
        self.state.is_dirty = true;
    }

    pub fn set_out_point(&mut self, position: Option<Time>) {
        self.state.project.out_point = position;
        self.state.is_dirty = true;
    }

    /// Marks the in point at the current playhead position.
    pub fn mark_in(&mut self) {
        self.set_in_point(Some(self.state.project.playhead));
    }

    /// Marks the out point at the current playhead position.
    pub fn mark_out(&mut self) {
        self.set_out_point(Some(self.state.project.playhead));
    }

    pub fn clear_in_out_points(&mut self) {
        self.state.project.in_point = None;
        self.state.project.out_point = None;
        self.state.is_dirty = true;
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Saves the project to disk and clears the dirty flag.
    pub fn save_snapshot(&mut self, path: &Path) -> EditorResult<()> {
        Snapshot::save(path, &self.state.project)?;
        self.state.is_dirty = false;
        Ok(())
    }

    /// Loads a project from disk into a fresh editor (empty selection and
    /// history, stopped playback).
    pub fn load_snapshot(path: &Path) -> EditorResult<Self> {
        let project = Snapshot::load(path)?;
        Ok(Self::new(project))
    }
}

// =============================================================================
// Tests
// =============================================================================
