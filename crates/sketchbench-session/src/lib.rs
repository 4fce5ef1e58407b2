//! `sketchbench-session` - The sketch editing session core.
//!
//! This crate models an editing session for a multi-file sketch backed by a
//! remote project store:
//!
//! - **Session store**: the loaded project, open files with their
//!   last-synced content, and the active file selector
//! - **Sync controller**: fixed-order protocols for load, open, save,
//!   create, delete, rename, and project creation
//! - **Remote contracts**: the store and toolchain traits the controller
//!   drives, implemented by a service client or by test doubles
//!
//! # Architecture
//!
//! The session store is a pure in-memory container; every network exchange
//! is sequenced by the controller, which mutates the store only after the
//! remote side has succeeded. A failed operation therefore leaves the
//! session exactly as it was.
//!
//! # Example
//!
//! ```ignore
//! use sketchbench_session::{ProjectIdentity, SyncController};
//!
//! let mut controller = SyncController::new(client);
//! controller
//!     .load_project(ProjectIdentity::new("Blink", "/sketchbook/Blink"))
//!     .await?;
//!
//! let active = controller.session().active_file();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

/// Sync controller and operation outcomes.
pub mod controller;
pub mod error;
/// Project identity and file keys.
pub mod project;
/// Remote store and toolchain contracts.
pub mod remote;
pub mod session;

pub use controller::{RenameOutcome, SaveOutcome, SyncController};
pub use error::{SessionError, StoreError};
pub use project::{FileKey, ProjectIdentity};
pub use remote::{ProjectStore, Toolchain, ToolchainReport};
pub use session::{Session, SessionPhase};
