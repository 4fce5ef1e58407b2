//! Board, core, example, and build commands.

use anyhow::Context;
use sketchbench_client::{BoardDefaults, ServiceClient};
use sketchbench_session::{SyncController, ToolchainReport};

use crate::{prompt, sketch, style};

pub async fn run_boards(client: ServiceClient) -> anyhow::Result<()> {
    let boards = client.boards().await?;
    if boards.is_empty() {
        println!("{}", style::warning("No boards found. Install a core first."));
        return Ok(());
    }
    for board in boards {
        let platform = board
            .platform
            .map(|platform| platform.name)
            .unwrap_or_default();
        if platform.is_empty() {
            println!("{}  {}", style::accent(&board.fqbn), board.name);
        } else {
            println!("{}  {} ({platform})", style::accent(&board.fqbn), board.name);
        }
    }
    Ok(())
}

pub async fn run_cores(client: ServiceClient) -> anyhow::Result<()> {
    let cores = client.installed_cores().await?;
    if cores.is_empty() {
        println!("No cores installed.");
        return Ok(());
    }
    for core in cores {
        let version = core.installed_version.as_deref().unwrap_or("?");
        let owner = core.maintainer.or(core.name).unwrap_or_default();
        if owner.is_empty() {
            println!("{}  {version}", style::accent(&core.id));
        } else {
            println!("{}  {version}  {owner}", style::accent(&core.id));
        }
    }
    Ok(())
}

pub async fn run_add_board_url(client: ServiceClient, url: &str) -> anyhow::Result<()> {
    let spinner = style::spinner("Adding package index URL and refreshing...")?;
    let outcome = client.add_board_index_url(url).await;
    spinner.finish_and_clear();
    let outcome = outcome?;
    if !outcome.output.trim().is_empty() {
        println!("{}", outcome.output.trim_end());
    }
    if let Some(error) = outcome.error {
        anyhow::bail!(error);
    }
    println!("{}", style::success("Package index updated"));
    Ok(())
}

pub async fn run_examples(client: ServiceClient) -> anyhow::Result<()> {
    let examples = client.examples().await?;
    if examples.is_empty() {
        println!("No examples available.");
        return Ok(());
    }
    for example in examples {
        println!("{}", style::accent(&example.name));
    }
    Ok(())
}

pub async fn run_compile(
    client: ServiceClient,
    sketch_name: &str,
    fqbn: Option<String>,
    board: &BoardDefaults,
) -> anyhow::Result<()> {
    let fqbn = resolve_fqbn(fqbn, board)?;
    let mut controller = sketch::load_controller(client, sketch_name).await?;
    let buffer = active_buffer(&controller);
    let spinner = style::spinner(format!("Compiling {sketch_name} for {fqbn}..."))?;
    let report = controller.compile_active(&fqbn, &buffer).await;
    spinner.finish_and_clear();
    print_report(&report?)
}

pub async fn run_upload(
    client: ServiceClient,
    sketch_name: &str,
    fqbn: Option<String>,
    port: Option<String>,
    board: &BoardDefaults,
) -> anyhow::Result<()> {
    let fqbn = resolve_fqbn(fqbn, board)?;
    let port = match port.or_else(|| board.port.clone()) {
        Some(port) => port,
        None => prompt::prompt_string("Serial port", "/dev/ttyACM0")?,
    };
    let mut controller = sketch::load_controller(client, sketch_name).await?;
    let buffer = active_buffer(&controller);
    let spinner = style::spinner(format!("Uploading {sketch_name} to {port}..."))?;
    let report = controller.upload_active(&fqbn, &port, &buffer).await;
    spinner.finish_and_clear();
    print_report(&report?)
}

fn resolve_fqbn(flag: Option<String>, board: &BoardDefaults) -> anyhow::Result<String> {
    flag.or_else(|| board.fqbn.clone())
        .context("no board selected: pass --fqbn or set [board] fqbn in sketchbench.toml")
}

/// The synced content of the active file, so a pre-build save has nothing new to write.
fn active_buffer<R>(controller: &SyncController<R>) -> String {
    controller
        .session()
        .active_file()
        .and_then(|key| controller.session().content(key))
        .unwrap_or_default()
        .to_string()
}

fn print_report(report: &ToolchainReport) -> anyhow::Result<()> {
    if !report.output.trim().is_empty() {
        println!("{}", report.output.trim_end());
    }
    if report.success {
        println!("{}", style::success("Done"));
        Ok(())
    } else {
        anyhow::bail!("the toolchain reported a failure")
    }
}
