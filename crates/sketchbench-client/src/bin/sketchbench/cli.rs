//! CLI definitions for sketchbench.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "sketchbench",
    version,
    about = "Workbench CLI for a remote sketch service",
    infer_subcommands = true,
    arg_required_else_help = true,
    after_help = "Examples:\n  sketchbench sketches                          # list sketches\n  sketchbench files Blink                       # load Blink and list its files\n  sketchbench put Blink Blink.ino --from ./Blink.ino\n  sketchbench compile Blink --fqbn arduino:avr:uno"
)]
pub struct Cli {
    /// Service base URL (overrides configuration).
    #[arg(long, global = true)]
    pub service: Option<String>,
    /// Config file path (defaults to sketchbench.toml in the working directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Show request-level details.
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List sketches known to the service.
    Sketches,
    /// Create a new sketch and load it.
    New {
        /// Sketch name (letters, digits, '_' and '-').
        name: String,
    },
    /// Load a sketch and list its files.
    Files {
        /// Sketch name.
        sketch: String,
    },
    /// Print the content of a sketch file.
    Cat {
        /// Sketch name.
        sketch: String,
        /// File name within the sketch.
        file: String,
    },
    /// Save new content into a sketch file.
    #[command(
        after_help = "Examples:\n  sketchbench put Blink Blink.ino --from ./Blink.ino\n  sketchbench put Blink notes.txt --text 'red wire on pin 13'"
    )]
    Put {
        /// Sketch name.
        sketch: String,
        /// File name within the sketch.
        file: String,
        /// Read the content from a local file.
        #[arg(long, conflicts_with = "text")]
        from: Option<PathBuf>,
        /// Use the given text as the content.
        #[arg(long)]
        text: Option<String>,
    },
    /// Create an empty file in a sketch.
    Add {
        /// Sketch name.
        sketch: String,
        /// Name of the file to create.
        file: String,
    },
    /// Delete a file from a sketch.
    Rm {
        /// Sketch name.
        sketch: String,
        /// Name of the file to delete.
        file: String,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Rename a file within a sketch.
    Mv {
        /// Sketch name.
        sketch: String,
        /// Current file name.
        file: String,
        /// New file name.
        new_name: String,
    },
    /// List boards known to the installed cores.
    Boards,
    /// List installed platform cores.
    Cores,
    /// Add a board package index URL and refresh the index.
    AddBoardUrl {
        /// Package index URL.
        url: String,
    },
    /// Search, install, and list libraries.
    Lib {
        #[command(subcommand)]
        action: LibraryAction,
    },
    /// List built-in example sketches.
    Examples,
    /// Compile a sketch (saves the active file first).
    Compile {
        /// Sketch name.
        sketch: String,
        /// Fully qualified board name (falls back to configuration).
        #[arg(long)]
        fqbn: Option<String>,
    },
    /// Upload a sketch to a board (saves the active file first).
    Upload {
        /// Sketch name.
        sketch: String,
        /// Fully qualified board name (falls back to configuration).
        #[arg(long)]
        fqbn: Option<String>,
        /// Serial port (falls back to configuration, then to a prompt).
        #[arg(long)]
        port: Option<String>,
    },
    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
#[command(infer_subcommands = true)]
pub enum LibraryAction {
    /// Search the library index.
    Search {
        /// Search terms.
        query: String,
    },
    /// Install a library by name.
    Install {
        /// Library name as listed in the index.
        name: String,
    },
    /// List installed libraries.
    Installed,
}
