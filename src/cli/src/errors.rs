//! Error types for the CLI.

use spx_core::LedgerError;
use std::error::Error as StdError;
use std::fmt;

/// Errors that can occur in the CLI.
#[derive(Debug)]
pub enum CliError {
    /// Error when a file operation fails.
    FileError(std::io::Error),

    /// Error when JSON serialization or deserialization fails.
    JsonError(serde_json::Error),

    /// Error when the ledger rejects an operation.
    LedgerError(LedgerError),

    /// Error when no deployed ledger exists at the state path.
    StateMissing(String),

    /// Error when a ledger is already deployed at the state path.
    StateExists(String),

    /// Error when an address argument is invalid.
    InvalidAddress(String),

    /// Error when an amount argument is invalid.
    InvalidAmount(String),

    /// Error when no caller account is available.
    MissingCaller,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileError(e) => write!(f, "File error: {}", e),
            CliError::JsonError(e) => write!(f, "JSON error: {}", e),
            CliError::LedgerError(e) => write!(f, "Ledger error: {}", e),
            CliError::StateMissing(path) => {
                write!(f, "No ledger deployed at {}. Run deploy first.", path)
            }
            CliError::StateExists(path) => write!(
                f,
                "A ledger is already deployed at {}. Use --force to replace it.",
                path
            ),
            CliError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            CliError::InvalidAmount(msg) => write!(f, "Invalid amount: {}", msg),
            CliError::MissingCaller => write!(
                f,
                "No caller account: pass --caller or set default_caller in the config"
            ),
        }
    }
}

impl StdError for CliError {}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::FileError(error)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        CliError::JsonError(error)
    }
}

impl From<LedgerError> for CliError {
    fn from(error: LedgerError) -> Self {
        CliError::LedgerError(error)
    }
}
