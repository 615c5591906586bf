//! Snapshot Module
//!
//! Saves and restores the project aggregate as a JSON document. Only the
//! project is persisted; session state (selection, playback, history) is
//! rebuilt fresh on load. Times serialize as integer microseconds, so a
//! save/load cycle is exact.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::EditorResult;
use crate::timeline::Project;

/// Manages project snapshots
pub struct Snapshot;

impl Snapshot {
    /// Saves a project snapshot to a file
    pub fn save(path: &Path, project: &Project) -> EditorResult<()> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut snapshot = project.clone();
        snapshot.touch();

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writer.flush()?;

        Ok(())
    }

    /// Loads a project snapshot from a file.
    ///
    /// Derived bookkeeping is recomputed on load, so a hand-edited file
    /// cannot smuggle in a stale duration or track index.
    pub fn load(path: &Path) -> EditorResult<Project> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut project: Project = serde_json::from_reader(reader)?;
        project.refresh();

        Ok(project)
    }

    /// Checks if a snapshot file exists
    pub fn exists(path: &Path) -> bool {
        path.exists()
    }
}

// =============================================================================
// Tests
// =============================================================================
