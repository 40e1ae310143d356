//! Error types for history sources.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching a history window.
///
/// Every variant aborts only the tick that produced it; the dashboard keeps
/// showing the previous data.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The history endpoint could not be reached.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timed out waiting for the endpoint.
    #[error("Request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status.
    #[error("History endpoint returned status {0}")]
    Status(u16),

    /// The body was not a JSON array of history records.
    #[error("Failed to parse history: {0}")]
    Decode(String),

    /// A replay file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}
