//! Library index commands.

use sketchbench_client::ServiceClient;

use crate::style;

pub async fn run_search(client: ServiceClient, query: &str) -> anyhow::Result<()> {
    let hits = client.search_libraries(query).await?;
    if hits.is_empty() {
        println!("No libraries matched '{query}'.");
        return Ok(());
    }
    for hit in hits {
        match &hit.latest {
            Some(release) => {
                let version = release.version.as_deref().unwrap_or("?");
                println!("{}  {version}", style::accent(&hit.name));
                if let Some(sentence) = &release.sentence {
                    println!("    {sentence}");
                }
            }
            None => println!("{}", style::accent(&hit.name)),
        }
    }
    Ok(())
}

pub async fn run_install(client: ServiceClient, name: &str) -> anyhow::Result<()> {
    let spinner = style::spinner(format!("Installing {name}..."))?;
    let outcome = client.install_library(name).await;
    spinner.finish_and_clear();
    let outcome = outcome?;
    if !outcome.output.trim().is_empty() {
        println!("{}", outcome.output.trim_end());
    }
    if let Some(error) = outcome.error {
        anyhow::bail!(error);
    }
    println!("{}", style::success(format!("Installed {name}")));
    Ok(())
}

pub async fn run_installed(client: ServiceClient) -> anyhow::Result<()> {
    let installed = client.installed_libraries().await?;
    if installed.is_empty() {
        println!("No libraries installed.");
        return Ok(());
    }
    for entry in installed {
        let library = entry.library;
        let version = library.version.as_deref().unwrap_or("?");
        println!("{}  {version}", style::accent(&library.name));
        if let Some(sentence) = library.sentence {
            println!("    {sentence}");
        }
    }
    Ok(())
}
