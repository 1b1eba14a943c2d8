//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use reflexion_core::EntryType;
use std::path::PathBuf;

/// Reflexion journal store driver.
#[derive(Parser, Debug)]
#[command(name = "reflexion", version, about)]
pub struct CliArgs {
    /// Journal database file.
    #[arg(long = "db", env = "REFLEXION_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long = "log-dir", env = "REFLEXION_LOG_DIR", global = true)]
    pub log_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long = "log-level", env = "REFLEXION_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print entries newest first, optionally only those with an exact tag.
    List {
        /// Emotion tag to match exactly.
        tag: Option<String>,
    },
    /// Record a new entry.
    Add {
        /// Entry type wire name (text, audio, video, ocr, drawnArt, uploadedArt, moodEntry).
        #[arg(value_parser = parse_entry_type)]
        kind: EntryType,
        content: String,
        /// Media file reference; required for audio, video and art.
        #[arg(long = "file")]
        file_url: Option<String>,
        #[arg(long = "tag")]
        tag: Option<String>,
    },
    /// Print the core library version.
    Version,
}

pub fn parse_entry_type(value: &str) -> Result<EntryType, String> {
    EntryType::ALL
        .into_iter()
        .find(|kind| kind.to_string() == value)
        .ok_or_else(|| format!("unknown entry type `{value}`"))
}
