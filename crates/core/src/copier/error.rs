//! Error types for the copy stage.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing to the target.
#[derive(Debug, Error)]
pub enum CopyError {
    /// Source file not found.
    #[error("Source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Failed to create destination directory.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to copy file.
    #[error("Failed to copy file from {} to {}: {error}", .from.display(), .to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to delete the source after copying.
    #[error("Failed to delete source file: {path}")]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CopyError {
    /// Creates a copy failed error.
    pub fn copy_failed(from: PathBuf, to: PathBuf, error: std::io::Error) -> Self {
        Self::CopyFailed { from, to, error }
    }
}
