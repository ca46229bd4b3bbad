//! Error types for the collection engine.

use crate::config::ConfigError;
use crate::transport::TransportError;
use std::path::PathBuf;
use thiserror::Error;

/// All possible errors from the collection engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Store errors
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid path '{}': {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: String },

    #[error("unexpected result: {0}")]
    UnexpectedResult(String),

    #[error("unexpected value: {0}")]
    UnexpectedValue(String),

    #[error("unwritable path: {}", .0.display())]
    UnwritablePath(PathBuf),

    #[error("missing required value: {0}")]
    WorthlessVariable(String),

    // Gateway errors, surfaced unchanged
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub(crate) fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error only reports that a store file does not exist yet.
    ///
    /// This is the single kind the engine recovers from locally.
    pub fn is_absence(&self) -> bool {
        matches!(self, Error::FileNotFound(_))
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
