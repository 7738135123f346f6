//! Errors surfaced by the language-service binding.

use thiserror::Error;

/// Errors that can occur while talking to the external validators.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Workspace configuration could not be resolved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The server lacks a capability the checker depends on.
    #[error("Language server does not support {0}")]
    MissingCapability(String),

    /// The server reported an error or sent a malformed message.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The server connection closed before a response arrived.
    #[error("Language server exited unexpectedly")]
    Disconnected,

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}
