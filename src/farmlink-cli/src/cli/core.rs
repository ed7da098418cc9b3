//! Core CLI definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "farmlink")]
#[command(about = "Reports Farming Simulator storage to a resource server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Server and save location options shared by `run` and `scan`
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Resource server base URL, e.g. http://localhost:8080 (uses configured default if not provided)
    #[arg(short, long, env = "FARMLINK_SERVER")]
    pub server: Option<String>,

    /// Farming Simulator documents folder holding the savegame slots
    #[arg(short, long, env = "FARMLINK_SAVE_ROOT")]
    pub root: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = 10)]
    pub timeout: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan once, then watch the save folder and rescan on every change
    #[command(visible_alias = "r")]
    Run {
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Scan all saves once and report their storage
    Scan {
        #[command(flatten)]
        server: ServerArgs,

        /// Print records as JSON lines instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the storage totals of a single save folder
    #[command(visible_alias = "i")]
    Inspect {
        /// Path to a savegame folder (containing careerSavegame.xml)
        folder: PathBuf,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set default resource server URL
        #[arg(long)]
        server: Option<String>,

        /// Set default save root folder
        #[arg(long)]
        root: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
