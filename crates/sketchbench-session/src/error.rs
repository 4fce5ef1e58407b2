//! Session and remote store errors.

use smol_str::SmolStr;
use thiserror::Error;

/// Failures surfaced by session operations.
///
/// Remote failures are recovered at the operation boundary: the session is
/// left unmodified and the error is reported upward. `InvalidSelection` and
/// `KeyNotFound` indicate a caller bug (a stale key or a missing
/// precondition), not a user or service fault, and are logged distinctly
/// because no retry can resolve them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The remote service could not be reached or failed internally.
    #[error("remote store unavailable: {0}")]
    RemoteUnavailable(SmolStr),

    /// The remote store has no entry at the requested path.
    #[error("not found in remote store: '{0}'")]
    NotFound(SmolStr),

    /// The caller selected a project or key outside the current session.
    #[error("invalid selection: {0}")]
    InvalidSelection(SmolStr),

    /// The caller referenced an open-file key that is not present.
    #[error("open file key not found: '{0}'")]
    KeyNotFound(SmolStr),

    /// A name failed local validation and was never sent to the store.
    #[error("name rejected: {0}")]
    ValidationRejected(SmolStr),
}

/// Failures reported by the remote store and toolchain contracts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Transport-level or service-side failure.
    #[error("service unavailable: {0}")]
    Unavailable(SmolStr),

    /// The requested path does not exist on the store.
    #[error("no such path '{0}'")]
    NotFound(SmolStr),
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Unavailable(message) => Self::RemoteUnavailable(message),
            StoreError::NotFound(path) => Self::NotFound(path),
        }
    }
}
