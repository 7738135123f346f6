//! Core pipeline error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during selection and loading.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File discovery failed while walking the source tree.
    #[error("Traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A selected file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CheckError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
