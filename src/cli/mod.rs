//! CLI definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for list/query commands.
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default)
    #[default]
    Table,
    /// JSON (same as --json)
    Json,
    /// Comma-separated values
    Csv,
}

pub mod commands;

/// Lockin - record and review completed focus timers
#[derive(Parser, Debug)]
#[command(name = "lockin", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: LOCKIN_DB, else ~/.lockin/data/timers.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Connection attempts before storage is declared unavailable
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format (table, json, csv)
    #[arg(long, value_enum, global = true, default_value_t)]
    pub format: OutputFormat,

    /// Output only the ID (for scripting)
    #[arg(long, global = true)]
    pub silent: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a completed timer
    Save {
        /// Timer title (blank uses the default title)
        title: String,

        /// Completed duration in seconds
        #[arg(allow_hyphen_values = true)]
        duration: String,
    },

    /// List completed timers, most recent first
    List {
        /// Maximum number of timers to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show daily activity for the past year
    Activity {
        /// Show the timers completed on one day (YYYY-MM-DD)
        #[arg(long)]
        day: Option<String>,
    },

    /// Show database location and connection health
    Status,

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
