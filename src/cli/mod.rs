//! CLI argument parsing for compact-guard
//!
//! Supports global flags: --format, --quiet, --verbose, --log-level,
//! --log-json, --config

pub mod parse;
pub mod paths;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub use compact_guard_core::format::OutputFormat;
use parse::parse_format;

/// compact-guard - keeps design decisions alive across context compaction
#[derive(Parser, Debug)]
#[command(name = "compact-guard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (human or json)
    #[arg(long, global = true, default_value = "human", value_parser = parse_format)]
    pub format: OutputFormat,

    /// Suppress diagnostics on stderr
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level filter (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (defaults to <config dir>/compact-guard/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Handlers invoked by the host; the event payload is read from stdin
    Hook {
        #[command(subcommand)]
        command: HookCommands,
    },

    /// Extract and store decisions from a transcript right now
    Extract(ExtractArgs),

    /// Print the stored decisions for a project
    Show(ProjectArgs),

    /// Show where decisions for a project are stored
    Status(ProjectArgs),

    /// Print the project key for a working-directory path
    Key {
        /// Working-directory path, exactly as the host reports it
        path: String,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookCommands {
    /// Capture decisions before the host compacts the conversation
    PreCompact,

    /// Re-inject stored decisions when a session starts or resumes
    SessionStart,
}

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project working directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Project working directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Transcript to read (defaults to the newest one for the project)
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Session id recorded with the summary
    #[arg(long, value_name = "ID")]
    pub session: Option<String>,
}
