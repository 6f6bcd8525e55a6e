//! Lapse daemon library.
//!
//! Wires the janitor to the SQLite metadata store and the filesystem blob
//! store from a TOML configuration file.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::{Cli, Command};
pub use config::{LapseConfig, StorageConfig};
pub use error::{CliError, Result};
