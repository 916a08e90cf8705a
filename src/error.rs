use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for multi-release operations
#[derive(Error, Debug)]
pub enum MultiReleaseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dependency graph error: {0}")]
    Graph(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Manifest error in '{}': {message}", .path.display())]
    Manifest { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in multi-release
pub type Result<T> = std::result::Result<T, MultiReleaseError>;

impl MultiReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        MultiReleaseError::Config(msg.into())
    }

    /// Create a graph error with context
    pub fn graph(msg: impl Into<String>) -> Self {
        MultiReleaseError::Graph(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        MultiReleaseError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        MultiReleaseError::Tag(msg.into())
    }

    /// Create a manifest error for the file at `path`
    pub fn manifest(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        MultiReleaseError::Manifest {
            path: path.into(),
            message: msg.into(),
        }
    }
}
