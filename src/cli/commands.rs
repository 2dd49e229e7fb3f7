//! CLI command implementations
//!
//! `start` loads configuration, applies flag overrides, then blocks on the
//! server inside a tokio runtime.

use std::fs;
use std::path::Path;

use crate::observability::{log_event_with_fields, Event, Logger};
use crate::server::{DasServer, ServerConfig};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Start { config, host, port } => {
            start(config.as_deref(), host.as_deref(), port)
        }
        Command::DefaultConfig => default_config(),
    }
}

/// Load configuration from an optional file, then apply overrides.
///
/// Without a file every default applies.
pub fn load_config(
    path: Option<&Path>,
    host: Option<&str>,
    port: Option<u16>,
) -> CliResult<ServerConfig> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .map_err(|e| CliError::Config(format!("Failed to read config: {}", e)))?;
            serde_json::from_str::<ServerConfig>(&content)
                .map_err(|e| CliError::Config(format!("Invalid config JSON: {}", e)))?
        }
        None => ServerConfig::default(),
    };

    if let Some(host) = host {
        config.host = host.to_string();
    }
    if let Some(port) = port {
        config.port = port;
    }

    config
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(config)
}

/// Start the DAS server and serve until interrupted
pub fn start(path: Option<&Path>, host: Option<&str>, port: Option<u16>) -> CliResult<()> {
    let config = load_config(path, host, port)?;

    let severity = config
        .severity()
        .map_err(|e| CliError::Config(e.to_string()))?;
    Logger::set_min_severity(severity);

    let port_str = config.port.to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("batch_size", config.batch_size.to_string().as_str()),
            ("host", config.host.as_str()),
            ("log_level", config.log_level.as_str()),
            ("port", port_str.as_str()),
        ],
    );
    log_event_with_fields(Event::ServerStart, &[("port", port_str.as_str())]);

    let server = DasServer::with_config(config);

    // Start the async runtime and run the server
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::Boot(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::Boot(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Print the default configuration as pretty JSON
pub fn default_config() -> CliResult<()> {
    let json = serde_json::to_string_pretty(&ServerConfig::default())?;
    println!("{}", json);
    Ok(())
}
