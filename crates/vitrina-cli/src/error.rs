//! CLI error type.

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors surfaced to the CLI user
#[derive(Debug, Error)]
pub enum CliError {
    /// The requested group does not exist in the suite
    #[error("unknown group '{0}' (try `vitrinador list`)")]
    UnknownGroup(String),

    /// Harness-level failure (fatal transport, broken config)
    #[error("{0}")]
    Harness(#[from] vitrina::HarnessError),

    /// Report file could not be written
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    /// Report could not be serialized
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
