// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Startup configuration problems. Any of these stops the process before a
/// transport is opened.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API_TOKEN must be set in environment variables")]
    MissingToken,
    #[error("invalid POI_API_ENDPOINT '{value}': {reason}")]
    InvalidEndpoint { value: String, reason: String },
    #[error("PORT must be a valid number, got '{0}'")]
    InvalidPort(String),
}

/// Per-call failures of the proof-of-invention tool. These are always
/// rendered into an error envelope, never propagated to the transport.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("cannot access file '{}': {}", path.display(), source)]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("upload failed: {0}")]
    Upload(String),
    #[error("malformed response from remote service: {0}")]
    MalformedResponse(String),
}

impl ToolError {
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ToolError::FileAccess {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        ToolError::Upload(err.to_string())
    }
}
