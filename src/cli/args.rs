//! CLI argument definitions using clap
//!
//! Commands:
//! - das-server start [--config <path>] [--host <host>] [--port <port>]
//! - das-server default-config

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DAS server - registers data-source instances and streams their tables
#[derive(Parser, Debug)]
#[command(name = "das-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the DAS server
    Start {
        /// Path to a JSON configuration file; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Host to bind to, overriding the config file
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on, overriding the config file
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the default configuration as JSON and exit
    DefaultConfig,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
