//! Session state for a loaded sketch.
//!
//! This module manages the in-memory editing session: the loaded project,
//! the open files with their last-synced content, and the active file
//! selector. Every operation here is synchronous and purely local; network
//! sequencing lives in the sync controller.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use indexmap::IndexMap;
use tracing::warn;

use crate::error::SessionError;
use crate::project::{FileKey, ProjectIdentity};

/// Observable lifecycle phase of a session.
///
/// Loads apply wholesale on completion, so an in-progress load is never
/// observable as a phase of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No project loaded.
    Empty,
    /// A project is loaded; file operations are available.
    Ready,
}

/// In-memory record of the loaded project, its open files, and the active
/// selection.
///
/// Invariant: the active file, when set, is a key present in the open-file
/// map. The map keeps insertion order so "first remaining key" after a
/// delete is deterministic.
#[derive(Debug, Default)]
pub struct Session {
    project: Option<ProjectIdentity>,
    open_files: IndexMap<FileKey, String>,
    active_file: Option<FileKey>,
}

impl Session {
    /// Create an empty session with no project loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// The loaded project, if any.
    pub fn project(&self) -> Option<&ProjectIdentity> {
        self.project.as_ref()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        if self.project.is_some() {
            SessionPhase::Ready
        } else {
            SessionPhase::Empty
        }
    }

    /// The active file key, if any.
    pub fn active_file(&self) -> Option<&FileKey> {
        self.active_file.as_ref()
    }

    /// Last-synced content for a key.
    pub fn content(&self, key: &FileKey) -> Option<&str> {
        self.open_files.get(key).map(String::as_str)
    }

    /// Whether a key is currently open.
    pub fn is_open(&self, key: &FileKey) -> bool {
        self.open_files.contains_key(key)
    }

    /// Open-file keys in insertion order.
    pub fn open_keys(&self) -> impl Iterator<Item = &FileKey> {
        self.open_files.keys()
    }

    /// First open key in insertion order.
    pub fn first_open_key(&self) -> Option<&FileKey> {
        self.open_files.keys().next()
    }

    /// Number of open files.
    pub fn open_count(&self) -> usize {
        self.open_files.len()
    }

    /// Replace the loaded project, dropping all open files and the active
    /// selection. Previous state is discarded, not merged.
    pub fn load_project(&mut self, identity: ProjectIdentity) {
        self.project = Some(identity);
        self.open_files.clear();
        self.active_file = None;
    }

    /// Insert or overwrite the synced content for a key. The active
    /// selection is left untouched.
    pub fn set_open_file(&mut self, key: FileKey, content: String) {
        self.open_files.insert(key, content);
    }

    /// Select an open file as active.
    pub fn set_active(&mut self, key: &FileKey) -> Result<(), SessionError> {
        if !self.open_files.contains_key(key) {
            warn!(key = key.as_str(), "activation of a key that is not open");
            return Err(SessionError::InvalidSelection(key.as_str().into()));
        }
        self.active_file = Some(key.clone());
        Ok(())
    }

    /// Remove an open file and return its content. Clears the active
    /// selection when the removed key was active; choosing a replacement is
    /// the caller's responsibility.
    pub fn remove_open_file(&mut self, key: &FileKey) -> Option<String> {
        let content = self.open_files.shift_remove(key)?;
        if self.active_file.as_ref() == Some(key) {
            self.active_file = None;
        }
        Some(content)
    }

    /// Move the content entry from `old_key` to `new_key`. When `old_key`
    /// was active, `new_key` becomes active.
    pub fn rename_open_file(
        &mut self,
        old_key: &FileKey,
        new_key: FileKey,
    ) -> Result<(), SessionError> {
        let Some(content) = self.open_files.shift_remove(old_key) else {
            warn!(key = old_key.as_str(), "rename of a key that is not open");
            return Err(SessionError::KeyNotFound(old_key.as_str().into()));
        };
        if self.active_file.as_ref() == Some(old_key) {
            self.active_file = Some(new_key.clone());
        }
        self.open_files.insert(new_key, content);
        Ok(())
    }
}
