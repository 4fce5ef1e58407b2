//! Wire types for the sketch service API.
//!
//! Field names follow the service's JSON. Where a field changed name
//! between service revisions, the older spelling is accepted as an alias.

use serde::Deserialize;

/// Response of `GET /api/sketches`.
#[derive(Debug, Deserialize)]
pub struct SketchListing {
    /// Known sketchbooks; the first one is authoritative.
    #[serde(default)]
    pub sketchbooks: Vec<Sketchbook>,
}

/// One sketchbook with its sketches in store order.
#[derive(Debug, Deserialize)]
pub struct Sketchbook {
    /// Root directory of the sketchbook.
    #[serde(default)]
    pub path: Option<String>,
    /// Sketches in store order.
    #[serde(default)]
    pub sketches: Vec<SketchSummary>,
}

/// One sketch as listed by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct SketchSummary {
    /// Short display name.
    pub name: String,
    /// Server-normalized root location.
    pub path: String,
}

/// Response of `GET /api/directories/sketchbook`.
#[derive(Debug, Deserialize)]
pub struct SketchbookDir {
    /// Sketchbook root directory.
    pub path: String,
}

/// Response of `GET /api/sketch/files`.
#[derive(Debug, Deserialize)]
pub struct FileListing {
    /// File names in store order.
    #[serde(default)]
    pub files: Vec<String>,
}

/// Response of `GET /api/sketch/file/content`.
#[derive(Debug, Deserialize)]
pub struct FileContent {
    /// Full file content.
    pub content: String,
}

/// Response of `POST /api/sketches/new`.
#[derive(Debug, Deserialize)]
pub struct CreatedSketch {
    /// Whether the creation succeeded.
    #[serde(default)]
    pub success: bool,
    /// Normalized path of the new sketch.
    #[serde(default)]
    pub path: Option<String>,
    /// Error text when the toolchain rejected the creation.
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `GET /api/boards`.
#[derive(Debug, Deserialize)]
pub struct BoardListing {
    /// All boards known to the installed cores.
    #[serde(default)]
    pub boards: Vec<BoardSummary>,
}

/// One board known to the toolchain.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardSummary {
    /// Human-readable board name.
    pub name: String,
    /// Fully qualified board name.
    pub fqbn: String,
    /// Owning platform, when the service reports it.
    #[serde(default)]
    pub platform: Option<PlatformRef>,
}

/// Platform reference attached to a board.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformRef {
    /// Platform display name.
    #[serde(default)]
    pub name: String,
}

/// Response of `GET /api/cores/installed`.
#[derive(Debug, Deserialize)]
pub struct CoreListing {
    /// Installed platforms.
    #[serde(default)]
    pub platforms: Vec<CoreSummary>,
}

/// One installed core. Older service revisions reported the version under
/// `version` rather than `installed_version`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreSummary {
    /// Platform id, e.g. `arduino:avr`.
    pub id: String,
    /// Installed version.
    #[serde(default, alias = "version")]
    pub installed_version: Option<String>,
    /// Platform maintainer.
    #[serde(default)]
    pub maintainer: Option<String>,
    /// Platform display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Response of `GET /api/libraries/search`.
#[derive(Debug, Deserialize)]
pub struct LibrarySearch {
    /// Matching libraries.
    #[serde(default)]
    pub libraries: Vec<LibraryHit>,
}

/// One library search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryHit {
    /// Library name.
    pub name: String,
    /// Latest published release.
    #[serde(default)]
    pub latest: Option<LibraryRelease>,
}

/// Release metadata of a library.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryRelease {
    /// Release version.
    #[serde(default)]
    pub version: Option<String>,
    /// One-line summary.
    #[serde(default)]
    pub sentence: Option<String>,
}

/// Response of `GET /api/libraries/installed`. Older service revisions used
/// the key `libraries`.
#[derive(Debug, Deserialize)]
pub struct InstalledLibraries {
    /// Installed libraries.
    #[serde(default, alias = "libraries")]
    pub installed_libraries: Vec<InstalledLibrary>,
}

/// Wrapper around an installed library entry.
#[derive(Debug, Clone, Deserialize)]
pub struct InstalledLibrary {
    /// The library metadata.
    pub library: LibraryInfo,
}

/// Metadata of an installed library.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryInfo {
    /// Library name.
    pub name: String,
    /// Installed version.
    #[serde(default)]
    pub version: Option<String>,
    /// Author line.
    #[serde(default)]
    pub author: Option<String>,
    /// One-line summary.
    #[serde(default)]
    pub sentence: Option<String>,
    /// Longer description.
    #[serde(default)]
    pub paragraph: Option<String>,
}

/// Response of `GET /api/examples`.
#[derive(Debug, Deserialize)]
pub struct ExampleListing {
    /// Built-in example sketches.
    #[serde(default)]
    pub examples: Vec<ExampleSketch>,
}

/// One built-in example sketch.
#[derive(Debug, Clone, Deserialize)]
pub struct ExampleSketch {
    /// Example name.
    pub name: String,
    /// Example source, when the service inlines it.
    #[serde(default)]
    pub code: Option<String>,
}

/// Command report returned by toolchain-backed endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandOutcome {
    /// Whether the underlying command succeeded.
    #[serde(default)]
    pub success: bool,
    /// Captured command output.
    #[serde(default)]
    pub output: String,
    /// Error text when the command failed.
    #[serde(default)]
    pub error: Option<String>,
}

/// Error body attached to non-2xx responses, including the initializing
/// gate's `{"error": "initializing", "message": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error tag.
    #[serde(default)]
    pub error: Option<String>,
    /// Human-readable detail.
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Whether this body is the service's initializing gate.
    pub fn is_initializing(&self) -> bool {
        self.error.as_deref() == Some("initializing")
    }

    /// Best human-readable detail line.
    pub fn detail(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}
