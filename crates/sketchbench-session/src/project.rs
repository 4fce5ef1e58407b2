//! Project identity and canonical file keys.

use smol_str::SmolStr;
use std::fmt;

use crate::error::SessionError;

/// Identity of a sketch as reported by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectIdentity {
    /// Short display name of the sketch.
    pub name: SmolStr,
    /// Server-normalized root location. Opaque to the session; it is only
    /// ever joined with a file name to form a [`FileKey`].
    pub path: SmolStr,
}

impl ProjectIdentity {
    /// Create an identity from a store-provided name/path pair.
    pub fn new(name: impl Into<SmolStr>, path: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for ProjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path)
    }
}

/// Canonical key for an open file: the project path joined with a file name.
///
/// Keys are built through [`FileKey::join`] and nowhere else; no call site
/// re-derives a key by concatenating strings. Rename and delete rewrite the
/// key explicitly, so files sharing a short name across projects never
/// collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileKey(SmolStr);

impl FileKey {
    /// Join a project path and a file name into a key.
    ///
    /// The file name must be non-empty and must not contain a separator;
    /// rejection is local and never reaches the remote store.
    pub fn join(project_path: &str, file_name: &str) -> Result<Self, SessionError> {
        if file_name.is_empty() {
            return Err(SessionError::ValidationRejected(
                "file name is empty".into(),
            ));
        }
        if file_name.contains('/') {
            return Err(SessionError::ValidationRejected(
                format!("file name '{file_name}' contains a path separator").into(),
            ));
        }
        let mut raw = String::with_capacity(project_path.len() + file_name.len() + 1);
        raw.push_str(project_path);
        raw.push('/');
        raw.push_str(file_name);
        Ok(Self(SmolStr::from(raw)))
    }

    /// The full key string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The file-name component after the last separator.
    pub fn file_name(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0.as_str()[idx + 1..],
            None => self.0.as_str(),
        }
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
