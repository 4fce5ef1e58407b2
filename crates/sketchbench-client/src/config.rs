//! Client configuration for the sketch service.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

pub(crate) const CONFIG_FILES: &[&str] = &["sketchbench.toml", ".sketchbench.toml"];

/// Client configuration loaded from `sketchbench.toml`.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Config file path (if found).
    pub config_path: Option<PathBuf>,
    /// Service connection settings.
    pub service: ServiceSettings,
    /// Default board selection for compile and upload.
    pub board: BoardDefaults,
}

impl ClientConfig {
    /// Load configuration for a working directory.
    ///
    /// A missing file yields defaults; an unreadable or unparsable file
    /// logs a warning and yields defaults.
    pub fn load(root: &Path) -> Self {
        let Some(path) = find_config_file(root) else {
            return ClientConfig::default();
        };
        ClientConfig::load_file(&path)
    }

    /// Load configuration from an explicit file path.
    pub fn load_file(path: &Path) -> Self {
        let Ok(contents) = std::fs::read_to_string(path) else {
            warn!("failed to read config at {}", path.display());
            return ClientConfig::default();
        };
        ClientConfig::from_contents(Some(path.to_path_buf()), &contents)
    }

    /// Parse configuration from file contents.
    pub fn from_contents(config_path: Option<PathBuf>, contents: &str) -> Self {
        let parsed: ConfigFile = match toml::from_str(contents) {
            Ok(parsed) => parsed,
            Err(err) => {
                if let Some(path) = &config_path {
                    warn!("failed to parse config at {}: {err}", path.display());
                } else {
                    warn!("failed to parse config: {err}");
                }
                return ClientConfig {
                    config_path,
                    ..ClientConfig::default()
                };
            }
        };
        ClientConfig {
            config_path,
            service: parsed.service.into(),
            board: parsed.board.into(),
        }
    }
}

/// Service connection settings.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Base URL of the sketch service.
    pub base_url: String,
    /// Readiness probe budget.
    pub ready_attempts: u32,
    /// Delay between readiness probes.
    pub ready_poll: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            ready_attempts: 20,
            ready_poll: Duration::from_secs(3),
        }
    }
}

/// Default board selection used when command flags are omitted.
#[derive(Debug, Clone, Default)]
pub struct BoardDefaults {
    /// Fully qualified board name.
    pub fqbn: Option<String>,
    /// Serial port for uploads.
    pub port: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    service: ServiceSection,
    #[serde(default)]
    board: BoardSection,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceSection {
    base_url: Option<String>,
    ready_attempts: Option<u32>,
    ready_poll_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct BoardSection {
    fqbn: Option<String>,
    port: Option<String>,
}

impl From<ServiceSection> for ServiceSettings {
    fn from(section: ServiceSection) -> Self {
        let defaults = ServiceSettings::default();
        ServiceSettings {
            base_url: section.base_url.unwrap_or(defaults.base_url),
            ready_attempts: section.ready_attempts.unwrap_or(defaults.ready_attempts),
            ready_poll: section
                .ready_poll_secs
                .map_or(defaults.ready_poll, Duration::from_secs),
        }
    }
}

impl From<BoardSection> for BoardDefaults {
    fn from(section: BoardSection) -> Self {
        BoardDefaults {
            fqbn: section.fqbn,
            port: section.port,
        }
    }
}

fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}
