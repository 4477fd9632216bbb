//! CLI module for notedb
//!
//! Provides command-line interface for:
//! - init: Create the database file and schema
//! - start: Boot the store and serve HTTP until shutdown

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, start, Config};
pub use errors::{CliError, CliResult};
