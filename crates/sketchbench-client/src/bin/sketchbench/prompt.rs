//! Interactive prompts with plain-stdin fallbacks for non-TTY use.

use std::io::{self, IsTerminal, Write};

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};

fn use_dialoguer() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

/// Prompt for a string value with a default.
pub(crate) fn prompt_string(label: &str, default: &str) -> anyhow::Result<String> {
    if use_dialoguer() {
        let value = Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(label)
            .default(default.to_string())
            .interact_text()?;
        return Ok(value);
    }
    print!("{label} [{default}]: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Prompt for a yes/no answer with a default.
pub(crate) fn prompt_yes_no(label: &str, default: bool) -> anyhow::Result<bool> {
    if use_dialoguer() {
        let value = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(label)
            .default(default)
            .interact()?;
        return Ok(value);
    }
    let hint = if default { "Y/n" } else { "y/N" };
    print!("{label} [{hint}]: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    match line.trim().to_lowercase().as_str() {
        "" => Ok(default),
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        _ => anyhow::bail!("Please answer yes or no."),
    }
}
