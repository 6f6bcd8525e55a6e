//! Command-line argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lapse - delete stored records once they outlive their TTL.
#[derive(Debug, Parser)]
#[command(name = "lapsed")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "LAPSE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log filter directive (e.g. "debug" or "lapse_janitor=debug");
    /// overrides RUST_LOG
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Daemon commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the janitor until interrupted (default)
    Run,

    /// Run a single sweep cycle and print the metrics
    SweepOnce,

    /// Print the effective configuration as TOML
    ShowConfig,
}
