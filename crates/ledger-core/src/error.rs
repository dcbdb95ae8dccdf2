use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the hotel ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The ledger file could not be opened or read from disk.
    #[error("Failed to read ledger file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A ledger record did not match the expected layout.
    #[error("Malformed booking on line {line}: {reason}")]
    Format { line: u64, reason: String },

    /// A JSON document could not be encoded or decoded.
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    /// Build a [`LedgerError::Format`] for the given 1-based file line.
    pub fn format(line: u64, reason: impl Into<String>) -> Self {
        LedgerError::Format {
            line,
            reason: reason.into(),
        }
    }

    /// `true` for errors caused by the content of the ledger rather than
    /// access to it.
    pub fn is_format(&self) -> bool {
        matches!(self, LedgerError::Format { .. })
    }
}

/// Convenience alias used throughout the ledger crates.
pub type Result<T> = std::result::Result<T, LedgerError>;
