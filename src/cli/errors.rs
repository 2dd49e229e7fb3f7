//! CLI errors. Each one ends the process with a non-zero exit.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Config file unreadable, malformed, or out of range
    #[error("DAS_CLI_CONFIG_ERROR: {0}")]
    Config(String),

    #[error("DAS_CLI_BOOT_FAILED: {0}")]
    Boot(String),

    #[error("DAS_CLI_OUTPUT_ERROR: {0}")]
    Output(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::Config("bad port".to_string());
        assert_eq!(err.to_string(), "DAS_CLI_CONFIG_ERROR: bad port");
    }
}
