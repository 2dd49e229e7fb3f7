//! CLI module for the DAS server
//!
//! Provides command-line interface for:
//! - start: Load configuration and serve
//! - default-config: Print the default configuration

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{default_config, load_config, run, run_command, start};
pub use errors::{CliError, CliResult};
