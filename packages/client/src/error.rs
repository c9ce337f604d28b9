//! Error types for the client runner.

use thiserror::Error;

/// Errors that end the client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid command line or configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The server could not be reached
    #[error("could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    /// The session task panicked or was cancelled
    #[error("session task failed: {0}")]
    SessionTask(#[from] tokio::task::JoinError),
}
