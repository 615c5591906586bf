//! Timeline Model Definitions
//!
//! Defines Project, Track, Clip and related types for timeline editing.
//! Tracks own their clips directly (denormalized) so the aggregate
//! serializes as one document and clones are whole-value.

use serde::{Deserialize, Serialize};

use crate::types::{ClipId, ProjectId, Ratio, Time, TimeRange, TrackId};

// =============================================================================
// Project Settings
// =============================================================================

/// Canvas size
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the aspect ratio as a float
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Project format settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    /// Canvas size
    pub canvas: Canvas,
    /// Frame rate
    pub fps: Ratio,
}

impl ProjectSettings {
    /// Creates settings for vertical short-form video (1080x1920, 30fps)
    pub fn shorts_1080() -> Self {
        Self {
            canvas: Canvas::new(1080, 1920),
            fps: Ratio::new(30, 1),
        }
    }

    /// Creates settings for landscape HD video (1920x1080, 30fps)
    pub fn youtube_1080() -> Self {
        Self {
            canvas: Canvas::new(1920, 1080),
            fps: Ratio::new(30, 1),
        }
    }

    /// Creates settings for 4K video (3840x2160, 30fps)
    pub fn uhd_4k() -> Self {
        Self {
            canvas: Canvas::new(3840, 2160),
            fps: Ratio::new(30, 1),
        }
    }
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self::youtube_1080()
    }
}

// =============================================================================
// Clip
// =============================================================================

/// Clip media type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClipKind {
    Video,
    Audio,
    Text,
    Effect,
}

/// Clip (media segment placed on a track)
///
/// `timeline_start`/`duration` describe the slot the clip occupies on the
/// timeline; `source_start`/`source_duration` describe the window into the
/// source media. `duration` never exceeds `source_duration` and
/// `track_index` always mirrors the position of the containing track
/// (re-synced by [`Project::refresh`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: ClipId,
    pub kind: ClipKind,
    pub name: String,
    /// Path of the source media file
    pub source_path: String,
    /// Start position on the timeline
    pub timeline_start: Time,
    /// Length occupied on the timeline
    pub duration: Time,
    /// Offset into the source media
    pub source_start: Time,
    /// Full length of the source media
    pub source_duration: Time,
    /// Index of the containing track (derived, kept in sync by the project)
    pub track_index: usize,
}

impl Clip {
    /// Creates a new clip covering the whole source, placed at zero.
    pub fn new(kind: ClipKind, name: &str, source_path: &str, source_duration: Time) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            kind,
            name: name.to_string(),
            source_path: source_path.to_string(),
            timeline_start: Time::ZERO,
            duration: source_duration,
            source_start: Time::ZERO,
            source_duration,
            track_index: 0,
        }
    }

    /// Places the clip at a specific timeline position
    pub fn place_at(mut self, timeline_start: Time) -> Self {
        self.timeline_start = timeline_start;
        self
    }

    /// Sets the timeline duration
    pub fn with_duration(mut self, duration: Time) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the window into the source media
    pub fn with_source_start(mut self, source_start: Time) -> Self {
        self.source_start = source_start;
        self
    }

    /// Returns the half-open interval the clip occupies on its track
    pub fn timeline_range(&self) -> TimeRange {
        TimeRange::new(self.timeline_start, self.duration)
    }

    /// Returns the timeline end position
    pub fn timeline_end(&self) -> Time {
        self.timeline_start + self.duration
    }
}

// =============================================================================
// Track
// =============================================================================

/// Track type/kind enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackKind {
    Video,
    Audio,
    Text,
    Effect,
}

impl TrackKind {
    /// Display label, also used for generated track names
    pub fn label(&self) -> &'static str {
        match self {
            TrackKind::Video => "Video",
            TrackKind::Audio => "Audio",
            TrackKind::Text => "Text",
            TrackKind::Effect => "Effect",
        }
    }
}

/// Track (ordered lane of non-overlapping clips of one kind)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    pub kind: TrackKind,
    pub name: String,
    /// Clips stored directly, kept sorted by timeline start
    pub clips: Vec<Clip>,
    pub muted: bool,
    pub locked: bool,
    pub visible: bool,
}

impl Track {
    /// Creates a new track with the given name and kind
    pub fn new(name: &str, kind: TrackKind) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            kind,
            name: name.to_string(),
            clips: vec![],
            muted: false,
            locked: false,
            visible: true,
        }
    }

    /// Creates a new video track
    pub fn new_video(name: &str) -> Self {
        Self::new(name, TrackKind::Video)
    }

    /// Creates a new audio track
    pub fn new_audio(name: &str) -> Self {
        Self::new(name, TrackKind::Audio)
    }

    /// Gets a clip by ID
    pub fn find_clip(&self, clip_id: &str) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == clip_id)
    }

    /// Inserts a clip, keeping the list sorted by timeline start
    pub fn insert_clip(&mut self, clip: Clip) {
        self.clips.push(clip);
        self.sort_clips();
    }

    /// Removes a clip by ID
    pub fn remove_clip(&mut self, clip_id: &str) -> Option<Clip> {
        let pos = self.clips.iter().position(|c| c.id == clip_id)?;
        Some(self.clips.remove(pos))
    }

    /// Re-establishes deterministic clip ordering: timeline start, then id
    /// when two clips share a start (they never overlap, but zero-length
    /// candidates can tie).
    pub fn sort_clips(&mut self) {
        self.clips.sort_by(|a, b| {
            a.timeline_start
                .cmp(&b.timeline_start)
                .then_with(|| a.id.cmp(&b.id))
        });
    }

    /// Returns the first clip whose range overlaps `candidate`, skipping
    /// `ignore_clip_id` so a clip being moved/resized is not tested against
    /// itself.
    pub fn overlapping_clip(
        &self,
        candidate: &TimeRange,
        ignore_clip_id: Option<&str>,
    ) -> Option<&Clip> {
        self.clips.iter().find(|existing| {
            if ignore_clip_id.is_some_and(|id| id == existing.id) {
                return false;
            }
            existing.timeline_range().overlaps(candidate)
        })
    }
}

// =============================================================================
// Project
// =============================================================================

/// Project (aggregate root over tracks, clips, and view state)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub settings: ProjectSettings,
    pub tracks: Vec<Track>,
    /// Total duration: max clip end over all tracks. Derived cache, only
    /// ever written by [`Project::refresh`].
    pub duration: Time,
    pub playhead: Time,
    pub in_point: Option<Time>,
    pub out_point: Option<Time>,
    /// Timeline zoom in pixels per second
    pub zoom_level: f64,
    /// Horizontal timeline scroll in pixels
    pub scroll_offset: f64,
    pub created_at: String,
    pub modified_at: String,
}

impl Project {
    /// Creates a new empty project
    pub fn new(name: &str, settings: ProjectSettings) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: ulid::Ulid::new().to_string(),
            name: name.to_string(),
            settings,
            tracks: vec![],
            duration: Time::ZERO,
            playhead: Time::ZERO,
            in_point: None,
            out_point: None,
            zoom_level: 100.0,
            scroll_offset: 0.0,
            created_at: now.clone(),
            modified_at: now,
        }
    }

    /// Updates the modified timestamp
    pub fn touch(&mut self) {
        self.modified_at = chrono::Utc::now().to_rfc3339();
    }

    /// Gets a track by ID
    pub fn track(&self, track_id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    /// Gets the index of a track by ID
    pub fn track_index(&self, track_id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == track_id)
    }

    /// Finds a clip anywhere in the project, returning its track index
    pub fn find_clip(&self, clip_id: &str) -> Option<(usize, &Clip)> {
        self.tracks.iter().enumerate().find_map(|(index, track)| {
            track.find_clip(clip_id).map(|clip| (index, clip))
        })
    }

    /// Iterates over all clips across all tracks
    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.tracks.iter().flat_map(|t| t.clips.iter())
    }

    /// Recomputes derived bookkeeping after a structural change: every
    /// clip's `track_index` and the cached total duration.
    pub fn refresh(&mut self) {
        for (index, track) in self.tracks.iter_mut().enumerate() {
            for clip in &mut track.clips {
                clip.track_index = index;
            }
        }
        self.duration = self
            .tracks
            .iter()
            .flat_map(|t| t.clips.iter())
            .map(Clip::timeline_end)
            .max()
            .unwrap_or(Time::ZERO);
    }
}

// =============================================================================
// Tests
// =============================================================================
