//! Contracts the session requires from the remote service.
//!
//! The store owns durable project and file state; the toolchain owns board
//! builds and flashing. Both are consumed as opaque request/response
//! services with no session state shared across the boundary.

use async_trait::async_trait;
use smol_str::SmolStr;

use crate::error::StoreError;
use crate::project::{FileKey, ProjectIdentity};

/// Outcome of a toolchain command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainReport {
    /// Whether the command succeeded.
    pub success: bool,
    /// Combined command output, present on success and failure alike.
    pub output: String,
}

/// Durable project and file storage owned by the remote service.
#[async_trait]
pub trait ProjectStore {
    /// List known projects in store order.
    async fn list_projects(&self) -> Result<Vec<ProjectIdentity>, StoreError>;

    /// List the file names of a project in store order.
    async fn list_files(&self, project_path: &str) -> Result<Vec<String>, StoreError>;

    /// Read the full content of a file.
    async fn read_file(&self, key: &FileKey) -> Result<String, StoreError>;

    /// Write the full content of a file.
    async fn write_file(&self, key: &FileKey, content: &str) -> Result<(), StoreError>;

    /// Create an empty file.
    async fn create_file(&self, key: &FileKey) -> Result<(), StoreError>;

    /// Delete a file.
    async fn delete_file(&self, key: &FileKey) -> Result<(), StoreError>;

    /// Rename a file within its project, keeping its content.
    async fn rename_file(&self, key: &FileKey, new_name: &str) -> Result<(), StoreError>;

    /// Create an empty project and return its normalized path.
    async fn create_project(&self, name: &str) -> Result<SmolStr, StoreError>;
}

/// Build and flash actions owned by the remote service.
#[async_trait]
pub trait Toolchain {
    /// Compile a project for a board.
    async fn compile(&self, fqbn: &str, project_path: &str)
        -> Result<ToolchainReport, StoreError>;

    /// Upload a compiled project to a board on a serial port.
    async fn upload(
        &self,
        fqbn: &str,
        port: &str,
        project_path: &str,
    ) -> Result<ToolchainReport, StoreError>;
}
