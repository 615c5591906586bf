//! Reversible edit commands.
//!
//! Each variant captures full before/after data at construction time, so it
//! can be replayed in either direction without consulting history or
//! re-deriving anything from current state.

use serde::{Deserialize, Serialize};

use crate::commands::ProjectStore;
use crate::error::{EditorError, EditorResult};
use crate::timeline::{Clip, Project, Track};
use crate::types::{ClipId, Time, TrackId};

/// Replay direction for a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Captured placement of a clip (for move replay).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipSpot {
    pub track_index: usize,
    pub start: Time,
}

/// Captured trim geometry of a clip (for resize replay).
///
/// A start-anchored resize changes timeline start, duration, and source
/// offset together, so all three travel as one value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipTrim {
    pub timeline_start: Time,
    pub duration: Time,
    pub source_start: Time,
}

impl ClipTrim {
    /// Captures the trim geometry of an existing clip.
    pub fn of(clip: &Clip) -> Self {
        Self {
            timeline_start: clip.timeline_start,
            duration: clip.duration,
            source_start: clip.source_start,
        }
    }
}

/// A reversible edit over the project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum EditCommand {
    AddClip {
        track_id: TrackId,
        clip: Clip,
    },
    /// Captures the full removed clip so reverse replay re-inserts it
    /// verbatim, without overlap validation.
    RemoveClip {
        track_id: TrackId,
        clip: Clip,
    },
    MoveClip {
        clip_id: ClipId,
        from: ClipSpot,
        to: ClipSpot,
    },
    ResizeClip {
        clip_id: ClipId,
        from: ClipTrim,
        to: ClipTrim,
    },
    AddTrack {
        track: Track,
        index: usize,
    },
    /// Captures the full removed track (clips included) and its original
    /// index so reverse replay splices it back at the same position.
    RemoveTrack {
        track: Track,
        index: usize,
    },
    /// Generic single-clip property change, captured as whole before/after
    /// values.
    UpdateClip {
        before: Clip,
        after: Clip,
    },
    /// Generic project-level property change (settings, track properties),
    /// captured as whole before/after aggregates.
    UpdateProject {
        before: Box<Project>,
        after: Box<Project>,
    },
    /// Ordered sub-commands; reverse replay runs them in reverse order.
    Composite {
        commands: Vec<EditCommand>,
    },
}

impl EditCommand {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            EditCommand::AddClip { .. } => "AddClip",
            EditCommand::RemoveClip { .. } => "RemoveClip",
            EditCommand::MoveClip { .. } => "MoveClip",
            EditCommand::ResizeClip { .. } => "ResizeClip",
            EditCommand::AddTrack { .. } => "AddTrack",
            EditCommand::RemoveTrack { .. } => "RemoveTrack",
            EditCommand::UpdateClip { .. } => "UpdateClip",
            EditCommand::UpdateProject { .. } => "UpdateProject",
            EditCommand::Composite { .. } => "Composite",
        }
    }

    /// Replays the command against the store in the given direction.
    pub fn apply(&self, store: &mut dyn ProjectStore, direction: Direction) -> EditorResult<()> {
        match self {
            EditCommand::AddClip { track_id, clip } => match direction {
                Direction::Forward => store.add_clip(track_id, clip.clone()),
                Direction::Reverse => store.remove_clip(&clip.id).map(|_| ()),
            },
            EditCommand::RemoveClip { track_id, clip } => match direction {
                Direction::Forward => store.remove_clip(&clip.id).map(|_| ()),
                Direction::Reverse => store.add_clip(track_id, clip.clone()),
            },
            EditCommand::MoveClip { clip_id, from, to } => {
                let target = match direction {
                    Direction::Forward => to,
                    Direction::Reverse => from,
                };
                apply_move(store, clip_id, target)
            }
            EditCommand::ResizeClip { clip_id, from, to } => {
                let target = match direction {
                    Direction::Forward => to,
                    Direction::Reverse => from,
                };
                let mut clip = store
                    .project()
                    .find_clip(clip_id)
                    .map(|(_, clip)| clip.clone())
                    .ok_or_else(|| EditorError::ClipNotFound(clip_id.clone()))?;
                clip.timeline_start = target.timeline_start;
                clip.duration = target.duration;
                clip.source_start = target.source_start;
                store.update_clip(clip)
            }
            EditCommand::AddTrack { track, index } => match direction {
                Direction::Forward => {
                    store.add_track(track.clone(), *index);
                    Ok(())
                }
                Direction::Reverse => store.remove_track(&track.id).map(|_| ()),
            },
            EditCommand::RemoveTrack { track, index } => match direction {
                Direction::Forward => store.remove_track(&track.id).map(|_| ()),
                Direction::Reverse => {
                    store.add_track(track.clone(), *index);
                    Ok(())
                }
            },
            EditCommand::UpdateClip { before, after } => {
                let target = match direction {
                    Direction::Forward => after,
                    Direction::Reverse => before,
                };
                store.update_clip(target.clone())
            }
            EditCommand::UpdateProject { before, after } => {
                let target = match direction {
                    Direction::Forward => after,
                    Direction::Reverse => before,
                };
                store.update_project((**target).clone());
                Ok(())
            }
            EditCommand::Composite { commands } => {
                match direction {
                    Direction::Forward => {
                        for command in commands {
                            command.apply(store, direction)?;
                        }
                    }
                    Direction::Reverse => {
                        for command in commands.iter().rev() {
                            command.apply(store, direction)?;
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

/// Moves a clip to a captured spot: the clip is lifted out of its current
/// track and re-inserted on the target track with the recorded start.
fn apply_move(store: &mut dyn ProjectStore, clip_id: &ClipId, spot: &ClipSpot) -> EditorResult<()> {
    let track_id = store
        .project()
        .tracks
        .get(spot.track_index)
        .map(|track| track.id.clone())
        .ok_or(EditorError::TrackIndexOutOfBounds(spot.track_index))?;

    let mut clip = store.remove_clip(clip_id)?;
    clip.timeline_start = spot.start;
    store.add_clip(&track_id, clip)
}

// =============================================================================
// Tests
// =============================================================================
