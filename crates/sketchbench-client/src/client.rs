//! HTTP client for the sketch service.
//!
//! Implements the store and toolchain contracts over the service's JSON
//! API. No request timeouts are configured; a call is awaited until it
//! completes or the transport fails.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use smol_str::SmolStr;
use tracing::{debug, error};

use sketchbench_session::{
    FileKey, ProjectIdentity, ProjectStore, StoreError, Toolchain, ToolchainReport,
};

use crate::types::{
    BoardListing, BoardSummary, CommandOutcome, CoreListing, CoreSummary, CreatedSketch,
    ErrorBody, ExampleListing, ExampleSketch, FileContent, FileListing, InstalledLibraries,
    InstalledLibrary, LibraryHit, LibrarySearch, SketchListing, SketchbookDir,
};

#[derive(Serialize)]
struct PathBody<'a> {
    path: &'a str,
}

#[derive(Serialize)]
struct WriteBody<'a> {
    path: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct RenameBody<'a> {
    old_path: &'a str,
    new_name: &'a str,
}

#[derive(Serialize)]
struct NameBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct UrlBody<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct CompileBody<'a> {
    fqbn: &'a str,
    sketch_path: &'a str,
}

#[derive(Serialize)]
struct UploadBody<'a> {
    fqbn: &'a str,
    port: &'a str,
    sketch_path: &'a str,
}

/// Client for the sketch service HTTP API.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    /// Create a client for a service base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, StoreError> {
        debug!(path, "GET");
        let response = self
            .http
            .get(self.endpoint(path))
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        debug!(%method, path, "request");
        let response = self
            .http
            .request(method, self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    /// Sketchbook root directory of the service.
    pub async fn sketchbook_dir(&self) -> Result<String, StoreError> {
        let dir: SketchbookDir = self.get_json("/api/directories/sketchbook", &[]).await?;
        Ok(dir.path)
    }

    /// Boards known to the installed cores.
    pub async fn boards(&self) -> Result<Vec<BoardSummary>, StoreError> {
        let listing: BoardListing = self.get_json("/api/boards", &[]).await?;
        Ok(listing.boards)
    }

    /// Installed platform cores.
    pub async fn installed_cores(&self) -> Result<Vec<CoreSummary>, StoreError> {
        let listing: CoreListing = self.get_json("/api/cores/installed", &[]).await?;
        Ok(listing.platforms)
    }

    /// Add a board package index URL and refresh the service's index.
    pub async fn add_board_index_url(&self, url: &str) -> Result<CommandOutcome, StoreError> {
        self.send_json(Method::POST, "/api/config/add-url", &UrlBody { url })
            .await
    }

    /// Search the library index.
    pub async fn search_libraries(&self, query: &str) -> Result<Vec<LibraryHit>, StoreError> {
        let search: LibrarySearch = self
            .get_json("/api/libraries/search", &[("query", query)])
            .await?;
        Ok(search.libraries)
    }

    /// Install a library by name.
    pub async fn install_library(&self, name: &str) -> Result<CommandOutcome, StoreError> {
        self.send_json(Method::POST, "/api/libraries/install", &NameBody { name })
            .await
    }

    /// Installed libraries.
    pub async fn installed_libraries(&self) -> Result<Vec<InstalledLibrary>, StoreError> {
        let installed: InstalledLibraries = self.get_json("/api/libraries/installed", &[]).await?;
        Ok(installed.installed_libraries)
    }

    /// Built-in example sketches.
    pub async fn examples(&self) -> Result<Vec<ExampleSketch>, StoreError> {
        let listing: ExampleListing = self.get_json("/api/examples", &[]).await?;
        Ok(listing.examples)
    }

    /// Probe whether the service has finished its workspace bootstrap.
    ///
    /// While the bootstrap runs, every API route answers 503 with an
    /// initializing body; that counts as "not ready", not as a failure.
    pub async fn ready(&self) -> Result<bool, StoreError> {
        let response = self
            .http
            .get(self.endpoint("/api/sketches"))
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Ok(false);
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }

    /// Poll until the service is ready, probing up to `attempts` times with
    /// `interval` between probes.
    pub async fn wait_until_ready(
        &self,
        attempts: u32,
        interval: Duration,
    ) -> Result<(), StoreError> {
        for attempt in 1..=attempts {
            if self.ready().await? {
                return Ok(());
            }
            debug!(attempt, "service still initializing");
            if attempt < attempts {
                tokio::time::sleep(interval).await;
            }
        }
        Err(StoreError::Unavailable(
            "service did not finish initializing within the probe budget".into(),
        ))
    }
}

#[async_trait]
impl ProjectStore for ServiceClient {
    async fn list_projects(&self) -> Result<Vec<ProjectIdentity>, StoreError> {
        let listing: SketchListing = self.get_json("/api/sketches", &[]).await?;
        let sketches = listing
            .sketchbooks
            .into_iter()
            .next()
            .map(|book| book.sketches)
            .unwrap_or_default();
        Ok(sketches
            .into_iter()
            .map(|sketch| ProjectIdentity::new(sketch.name, sketch.path))
            .collect())
    }

    async fn list_files(&self, project_path: &str) -> Result<Vec<String>, StoreError> {
        let listing: FileListing = self
            .get_json("/api/sketch/files", &[("path", project_path)])
            .await
            .map_err(|err| named_not_found(err, project_path))?;
        Ok(listing.files)
    }

    async fn read_file(&self, key: &FileKey) -> Result<String, StoreError> {
        let body: FileContent = self
            .get_json("/api/sketch/file/content", &[("path", key.as_str())])
            .await
            .map_err(|err| named_not_found(err, key.as_str()))?;
        Ok(body.content)
    }

    async fn write_file(&self, key: &FileKey, content: &str) -> Result<(), StoreError> {
        let outcome: CommandOutcome = self
            .send_json(
                Method::PUT,
                "/api/sketch/file/content",
                &WriteBody {
                    path: key.as_str(),
                    content,
                },
            )
            .await
            .map_err(|err| named_not_found(err, key.as_str()))?;
        check_outcome(&outcome)
    }

    async fn create_file(&self, key: &FileKey) -> Result<(), StoreError> {
        let outcome: CommandOutcome = self
            .send_json(
                Method::POST,
                "/api/sketch/file",
                &PathBody { path: key.as_str() },
            )
            .await?;
        check_outcome(&outcome)
    }

    async fn delete_file(&self, key: &FileKey) -> Result<(), StoreError> {
        let outcome: CommandOutcome = self
            .send_json(
                Method::DELETE,
                "/api/sketch/file",
                &PathBody { path: key.as_str() },
            )
            .await
            .map_err(|err| named_not_found(err, key.as_str()))?;
        check_outcome(&outcome)
    }

    async fn rename_file(&self, key: &FileKey, new_name: &str) -> Result<(), StoreError> {
        let outcome: CommandOutcome = self
            .send_json(
                Method::POST,
                "/api/sketch/file/rename",
                &RenameBody {
                    old_path: key.as_str(),
                    new_name,
                },
            )
            .await
            .map_err(|err| named_not_found(err, key.as_str()))?;
        check_outcome(&outcome)
    }

    async fn create_project(&self, name: &str) -> Result<SmolStr, StoreError> {
        let created: CreatedSketch = self
            .send_json(Method::POST, "/api/sketches/new", &NameBody { name })
            .await?;
        if let Some(error) = created.error {
            return Err(StoreError::Unavailable(SmolStr::from(error)));
        }
        created
            .path
            .map(SmolStr::from)
            .ok_or_else(|| StoreError::Unavailable("creation response carried no path".into()))
    }
}

#[async_trait]
impl Toolchain for ServiceClient {
    async fn compile(
        &self,
        fqbn: &str,
        project_path: &str,
    ) -> Result<ToolchainReport, StoreError> {
        let outcome: CommandOutcome = self
            .send_json(
                Method::POST,
                "/api/compile",
                &CompileBody {
                    fqbn,
                    sketch_path: project_path,
                },
            )
            .await?;
        Ok(report_from(outcome))
    }

    async fn upload(
        &self,
        fqbn: &str,
        port: &str,
        project_path: &str,
    ) -> Result<ToolchainReport, StoreError> {
        let outcome: CommandOutcome = self
            .send_json(
                Method::POST,
                "/api/upload",
                &UploadBody {
                    fqbn,
                    port,
                    sketch_path: project_path,
                },
            )
            .await?;
        Ok(report_from(outcome))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(transport_error);
    }
    let body = response.text().await.unwrap_or_default();
    error!(%status, body = body.as_str(), "service request failed");
    Err(status_error(status, &body))
}

fn status_error(status: StatusCode, body: &str) -> StoreError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let detail = parsed.as_ref().and_then(ErrorBody::detail);
    if status == StatusCode::NOT_FOUND {
        return StoreError::NotFound(SmolStr::from(detail.unwrap_or("requested resource")));
    }
    if status == StatusCode::SERVICE_UNAVAILABLE
        && parsed.as_ref().is_some_and(ErrorBody::is_initializing)
    {
        let message = detail.unwrap_or("service is initializing");
        return StoreError::Unavailable(SmolStr::from(format!("initializing: {message}")));
    }
    match detail {
        Some(detail) => StoreError::Unavailable(SmolStr::from(detail)),
        None => StoreError::Unavailable(SmolStr::from(format!("HTTP {status}"))),
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    StoreError::Unavailable(SmolStr::from(err.to_string()))
}

fn named_not_found(err: StoreError, path: &str) -> StoreError {
    match err {
        StoreError::NotFound(_) => StoreError::NotFound(SmolStr::from(path)),
        other => other,
    }
}

fn check_outcome(outcome: &CommandOutcome) -> Result<(), StoreError> {
    match &outcome.error {
        Some(error) => Err(StoreError::Unavailable(SmolStr::from(error.as_str()))),
        None => Ok(()),
    }
}

fn report_from(outcome: CommandOutcome) -> ToolchainReport {
    let output = if outcome.output.is_empty() {
        outcome.error.unwrap_or_default()
    } else {
        outcome.output
    };
    ToolchainReport {
        success: outcome.success,
        output,
    }
}
