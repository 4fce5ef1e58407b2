//! Sketch and file commands driving the editing session.

use std::path::PathBuf;

use anyhow::Context;
use sketchbench_client::ServiceClient;
use sketchbench_session::{
    FileKey, ProjectIdentity, ProjectStore, RenameOutcome, SaveOutcome, Session, SyncController,
};

use crate::{prompt, style};

pub async fn run_sketches(client: ServiceClient) -> anyhow::Result<()> {
    let dir = client.sketchbook_dir().await?;
    let sketches = client.list_projects().await?;
    println!("Sketchbook: {dir}");
    if sketches.is_empty() {
        println!("No sketches found. Create one with `sketchbench new <name>`.");
        return Ok(());
    }
    for sketch in sketches {
        println!("{}  {}", style::accent(sketch.name.as_str()), sketch.path);
    }
    Ok(())
}

pub async fn run_new(client: ServiceClient, name: &str) -> anyhow::Result<()> {
    let mut controller = SyncController::new(client);
    let identity = controller.new_project(name).await?;
    println!("{}", style::success(format!("Created {identity}")));
    print_session(controller.session());
    Ok(())
}

pub async fn run_files(client: ServiceClient, sketch: &str) -> anyhow::Result<()> {
    let controller = load_controller(client, sketch).await?;
    print_session(controller.session());
    Ok(())
}

pub async fn run_cat(client: ServiceClient, sketch: &str, file: &str) -> anyhow::Result<()> {
    let mut controller = load_controller(client, sketch).await?;
    let key = file_key(&controller, file)?;
    controller.open_file(&key).await?;
    if let Some(content) = controller.session().content(&key) {
        print!("{content}");
    }
    Ok(())
}

pub async fn run_put(
    client: ServiceClient,
    sketch: &str,
    file: &str,
    from: Option<PathBuf>,
    text: Option<String>,
) -> anyhow::Result<()> {
    let content = match (from, text) {
        (Some(path), None) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, Some(text)) => text,
        _ => anyhow::bail!("pass exactly one of --from or --text"),
    };
    let mut controller = load_controller(client, sketch).await?;
    let key = file_key(&controller, file)?;
    controller.open_file(&key).await?;
    match controller.save_active(&content).await? {
        SaveOutcome::Saved => {
            println!("{}", style::success(format!("Saved {}", key.file_name())));
        }
        SaveOutcome::Unchanged => println!("Already up to date; no write issued."),
        SaveOutcome::NoActiveFile => anyhow::bail!("no active file to save"),
    }
    Ok(())
}

pub async fn run_add(client: ServiceClient, sketch: &str, file: &str) -> anyhow::Result<()> {
    let mut controller = load_controller(client, sketch).await?;
    let key = controller.create_file(file).await?;
    println!("{}", style::success(format!("Created {key}")));
    print_session(controller.session());
    Ok(())
}

pub async fn run_rm(
    client: ServiceClient,
    sketch: &str,
    file: &str,
    yes: bool,
) -> anyhow::Result<()> {
    let mut controller = load_controller(client, sketch).await?;
    let key = file_key(&controller, file)?;
    controller.open_file(&key).await?;
    if !yes {
        let question = format!("Delete {} from {sketch}?", key.file_name());
        if !prompt::prompt_yes_no(&question, false)? {
            println!("{}", style::warning("Aborted."));
            return Ok(());
        }
    }
    match controller.delete_active().await? {
        Some(next) => println!(
            "Deleted {}; now on {}",
            key.file_name(),
            style::accent(next.file_name())
        ),
        None => println!("Deleted {}; the sketch has no files left", key.file_name()),
    }
    Ok(())
}

pub async fn run_mv(
    client: ServiceClient,
    sketch: &str,
    file: &str,
    new_name: &str,
) -> anyhow::Result<()> {
    let mut controller = load_controller(client, sketch).await?;
    let key = file_key(&controller, file)?;
    controller.open_file(&key).await?;
    match controller.rename_active(new_name).await? {
        RenameOutcome::Renamed(new_key) => println!(
            "{}",
            style::success(format!(
                "Renamed {} -> {}",
                key.file_name(),
                new_key.file_name()
            ))
        ),
        RenameOutcome::Cancelled => println!("Nothing to do."),
    }
    Ok(())
}

/// Resolve a sketch by name and load it into a fresh session.
pub(crate) async fn load_controller(
    client: ServiceClient,
    sketch: &str,
) -> anyhow::Result<SyncController<ServiceClient>> {
    let identity = resolve_sketch(&client, sketch).await?;
    let mut controller = SyncController::new(client);
    controller.load_project(identity).await?;
    Ok(controller)
}

async fn resolve_sketch(client: &ServiceClient, name: &str) -> anyhow::Result<ProjectIdentity> {
    let sketches = client.list_projects().await?;
    sketches
        .into_iter()
        .find(|sketch| sketch.name.as_str() == name)
        .with_context(|| format!("no sketch named '{name}' on the service"))
}

fn file_key<R>(controller: &SyncController<R>, file: &str) -> anyhow::Result<FileKey> {
    let project = controller.session().project().context("no sketch loaded")?;
    Ok(FileKey::join(project.path.as_str(), file)?)
}

fn print_session(session: &Session) {
    let Some(project) = session.project() else {
        return;
    };
    println!("{}", style::accent(format!("{project}")));
    if session.open_count() == 0 {
        println!("  (no files)");
        return;
    }
    for key in session.open_keys() {
        let marker = if session.active_file() == Some(key) {
            "*"
        } else {
            " "
        };
        println!("  {marker} {}", key.file_name());
    }
}
