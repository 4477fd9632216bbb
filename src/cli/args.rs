//! CLI argument definitions using clap
//!
//! Commands:
//! - notedb init --config <path>
//! - notedb start --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// notedb - A self-hostable note service with write-back persistence
#[derive(Parser, Debug)]
#[command(name = "notedb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database file and schema
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./notedb.json")]
        config: PathBuf,
    },

    /// Start the note server
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./notedb.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
