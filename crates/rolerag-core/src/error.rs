use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Mismatched input lengths or otherwise malformed arguments.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A role name outside the configured set, or "all" on a mutating call.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// A persisted artifact could not be read or written.
    #[error("Storage failure at {path}: {reason}")]
    Storage { path: PathBuf, reason: String },

    /// The external embedding call failed. Not retried internally.
    #[error("Embedding failed: {0}")]
    Embedding(String),

    /// The external completion call failed. Not retried internally.
    #[error("Completion failed: {0}")]
    Completion(String),
}

impl Error {
    pub fn storage(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Storage { path: path.into(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
