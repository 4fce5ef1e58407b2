//! Command line workbench for a remote sketch service.

#[path = "sketchbench/cli.rs"]
mod cli;
#[path = "sketchbench/completions.rs"]
mod completions;
#[path = "sketchbench/library.rs"]
mod library;
#[path = "sketchbench/prompt.rs"]
mod prompt;
#[path = "sketchbench/sketch.rs"]
mod sketch;
#[path = "sketchbench/style.rs"]
mod style;
#[path = "sketchbench/toolchain.rs"]
mod toolchain;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, LibraryAction};
use sketchbench_client::{ClientConfig, ServiceClient, ServiceSettings};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(err) = run(cli).await {
        eprintln!("{}", style::error(format!("Error: {err:#}")));
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Command::Completions { shell } = &cli.command {
        return completions::run_completions(*shell);
    }

    let config = match &cli.config {
        Some(path) => ClientConfig::load_file(path),
        None => ClientConfig::load(&std::env::current_dir()?),
    };
    let base_url = cli
        .service
        .clone()
        .unwrap_or_else(|| config.service.base_url.clone());
    let client = ServiceClient::new(base_url);
    ensure_ready(&client, &config.service).await?;

    match cli.command {
        Command::Sketches => sketch::run_sketches(client).await,
        Command::New { name } => sketch::run_new(client, &name).await,
        Command::Files { sketch } => sketch::run_files(client, &sketch).await,
        Command::Cat { sketch, file } => sketch::run_cat(client, &sketch, &file).await,
        Command::Put {
            sketch,
            file,
            from,
            text,
        } => sketch::run_put(client, &sketch, &file, from, text).await,
        Command::Add { sketch, file } => sketch::run_add(client, &sketch, &file).await,
        Command::Rm { sketch, file, yes } => sketch::run_rm(client, &sketch, &file, yes).await,
        Command::Mv {
            sketch,
            file,
            new_name,
        } => sketch::run_mv(client, &sketch, &file, &new_name).await,
        Command::Boards => toolchain::run_boards(client).await,
        Command::Cores => toolchain::run_cores(client).await,
        Command::AddBoardUrl { url } => toolchain::run_add_board_url(client, &url).await,
        Command::Lib { action } => match action {
            LibraryAction::Search { query } => library::run_search(client, &query).await,
            LibraryAction::Install { name } => library::run_install(client, &name).await,
            LibraryAction::Installed => library::run_installed(client).await,
        },
        Command::Examples => toolchain::run_examples(client).await,
        Command::Compile { sketch, fqbn } => {
            toolchain::run_compile(client, &sketch, fqbn, &config.board).await
        }
        Command::Upload { sketch, fqbn, port } => {
            toolchain::run_upload(client, &sketch, fqbn, port, &config.board).await
        }
        // Handled before the readiness gate.
        Command::Completions { .. } => Ok(()),
    }
}

async fn ensure_ready(client: &ServiceClient, settings: &ServiceSettings) -> anyhow::Result<()> {
    if client.ready().await? {
        return Ok(());
    }
    let spinner = style::spinner("Waiting for the service to finish initializing...")?;
    let ready = client
        .wait_until_ready(settings.ready_attempts, settings.ready_poll)
        .await;
    spinner.finish_and_clear();
    ready?;
    Ok(())
}
