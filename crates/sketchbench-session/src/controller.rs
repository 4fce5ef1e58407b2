//! Sync controller: sequences remote calls and session mutations.
//!
//! Every public operation is a protocol with a fixed step order. Remote
//! steps run first; the session mutates only after the remote side has
//! succeeded, so a failed operation leaves the session in its last good
//! state and there is no error state to recover from.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use smol_str::SmolStr;
use tracing::{info, warn};

use crate::error::SessionError;
use crate::project::{FileKey, ProjectIdentity};
use crate::remote::{ProjectStore, Toolchain, ToolchainReport};
use crate::session::Session;

/// Result of a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Content differed from the synced snapshot and was written.
    Saved,
    /// Content matched the synced snapshot; no write was issued.
    Unchanged,
    /// No file is active; nothing to save.
    NoActiveFile,
}

/// Result of a rename request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The file now lives under the new key.
    Renamed(FileKey),
    /// Empty or unchanged name; treated as a user cancellation with no
    /// remote call.
    Cancelled,
}

/// Orchestrates session mutations around remote store calls.
///
/// Operations take `&mut self` and suspend only while awaiting the remote
/// side; across a suspension the session holds its pre-operation state.
/// The controller does not serialize overlapping operations; callers keep
/// at most one in flight.
#[derive(Debug)]
pub struct SyncController<R> {
    session: Session,
    remote: R,
}

impl<R> SyncController<R> {
    /// Create a controller with an empty session.
    pub fn new(remote: R) -> Self {
        Self {
            session: Session::new(),
            remote,
        }
    }

    /// Observable session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The remote service behind this controller.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    fn project_path(&self) -> Result<SmolStr, SessionError> {
        match self.session.project() {
            Some(identity) => Ok(identity.path.clone()),
            None => {
                warn!("operation issued with no project loaded");
                Err(SessionError::InvalidSelection("no project loaded".into()))
            }
        }
    }

    fn active_key(&self) -> Result<FileKey, SessionError> {
        match self.session.active_file() {
            Some(key) => Ok(key.clone()),
            None => {
                warn!("operation issued with no active file");
                Err(SessionError::InvalidSelection("no active file".into()))
            }
        }
    }
}

impl<R: ProjectStore> SyncController<R> {
    /// Load a project: list its files, read every one, then swap the
    /// session wholesale with the first listed file active.
    ///
    /// The listing order is authoritative and is not re-sorted. Any failed
    /// read aborts the whole load and leaves the previous session intact.
    pub async fn load_project(&mut self, identity: ProjectIdentity) -> Result<(), SessionError> {
        let names = self.remote.list_files(identity.path.as_str()).await?;
        let mut staged = Vec::with_capacity(names.len());
        for name in &names {
            let key = FileKey::join(identity.path.as_str(), name)?;
            let content = self.remote.read_file(&key).await?;
            staged.push((key, content));
        }

        info!(
            project = identity.name.as_str(),
            files = staged.len(),
            "project loaded"
        );
        self.session.load_project(identity);
        for (key, content) in staged {
            self.session.set_open_file(key, content);
        }
        if let Some(first) = self.session.first_open_key().cloned() {
            self.session.set_active(&first)?;
        }
        Ok(())
    }

    /// Open a file and make it active.
    ///
    /// A key that is already open is activated without any remote call;
    /// its held content is current for the session's duration.
    pub async fn open_file(&mut self, key: &FileKey) -> Result<(), SessionError> {
        if self.session.is_open(key) {
            return self.session.set_active(key);
        }
        let content = self.remote.read_file(key).await?;
        self.session.set_open_file(key.clone(), content);
        self.session.set_active(key)?;
        info!(key = key.as_str(), "file opened");
        Ok(())
    }

    /// Save the active file if the editor content differs from the synced
    /// snapshot.
    ///
    /// The snapshot advances only after a successful write; after a failed
    /// write the file is still seen as dirty, so a retried save attempts
    /// the write again.
    pub async fn save_active(&mut self, editor_content: &str) -> Result<SaveOutcome, SessionError> {
        let Some(key) = self.session.active_file().cloned() else {
            return Ok(SaveOutcome::NoActiveFile);
        };
        if self.session.content(&key) == Some(editor_content) {
            return Ok(SaveOutcome::Unchanged);
        }
        self.remote.write_file(&key, editor_content).await?;
        self.session.set_open_file(key.clone(), editor_content.to_owned());
        info!(key = key.as_str(), "file saved");
        Ok(SaveOutcome::Saved)
    }

    /// Create a file in the loaded project, then open and activate it.
    ///
    /// Name validation is local; an invalid name never reaches the store.
    pub async fn create_file(&mut self, name: &str) -> Result<FileKey, SessionError> {
        let project_path = self.project_path()?;
        let key = FileKey::join(project_path.as_str(), name)?;
        self.remote.create_file(&key).await?;
        info!(key = key.as_str(), "file created");
        self.open_file(&key).await?;
        Ok(key)
    }

    /// Delete the active file and activate the first remaining open key,
    /// if any. Returns the replacement selection.
    pub async fn delete_active(&mut self) -> Result<Option<FileKey>, SessionError> {
        let key = self.active_key()?;
        self.remote.delete_file(&key).await?;
        self.session.remove_open_file(&key);
        let replacement = self.session.first_open_key().cloned();
        if let Some(next) = &replacement {
            self.session.set_active(next)?;
        }
        info!(key = key.as_str(), "file deleted");
        Ok(replacement)
    }

    /// Rename the active file.
    ///
    /// An empty name or one equal to the current short name is a user
    /// cancellation: no remote call, session unchanged.
    pub async fn rename_active(&mut self, new_name: &str) -> Result<RenameOutcome, SessionError> {
        let old_key = self.active_key()?;
        if new_name.is_empty() || new_name == old_key.file_name() {
            return Ok(RenameOutcome::Cancelled);
        }
        let project_path = self.project_path()?;
        let new_key = FileKey::join(project_path.as_str(), new_name)?;
        self.remote.rename_file(&old_key, new_name).await?;
        self.session.rename_open_file(&old_key, new_key.clone())?;
        info!(
            from = old_key.as_str(),
            to = new_key.as_str(),
            "file renamed"
        );
        Ok(RenameOutcome::Renamed(new_key))
    }

    /// Create a project on the store and load it.
    ///
    /// Names are restricted to letters, digits, underscore, and hyphen;
    /// rejection is local.
    pub async fn new_project(&mut self, name: &str) -> Result<ProjectIdentity, SessionError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(SessionError::ValidationRejected(
                format!("invalid project name '{name}': use letters, digits, '_' or '-'").into(),
            ));
        }
        let path = self.remote.create_project(name).await?;
        let identity = ProjectIdentity::new(name, path);
        info!(project = name, path = identity.path.as_str(), "project created");
        self.load_project(identity.clone()).await?;
        Ok(identity)
    }
}

impl<R: ProjectStore + Toolchain> SyncController<R> {
    /// Compile the loaded project, saving the active file first.
    pub async fn compile_active(
        &mut self,
        fqbn: &str,
        editor_content: &str,
    ) -> Result<ToolchainReport, SessionError> {
        let project_path = self.project_path()?;
        self.save_active(editor_content).await?;
        info!(fqbn, project = project_path.as_str(), "compile requested");
        Ok(self.remote.compile(fqbn, project_path.as_str()).await?)
    }

    /// Upload the loaded project to a board, saving the active file first.
    pub async fn upload_active(
        &mut self,
        fqbn: &str,
        port: &str,
        editor_content: &str,
    ) -> Result<ToolchainReport, SessionError> {
        let project_path = self.project_path()?;
        self.save_active(editor_content).await?;
        info!(
            fqbn,
            port,
            project = project_path.as_str(),
            "upload requested"
        );
        Ok(self.remote.upload(fqbn, port, project_path.as_str()).await?)
    }
}
