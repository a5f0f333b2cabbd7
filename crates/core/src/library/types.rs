use std::path::PathBuf;

use thiserror::Error;

/// A library file together with its place below the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    pub local_path: PathBuf,
    /// Path relative to the source root; also the path below the target's music folder.
    pub relative_path: PathBuf,
}

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Library database not found: {0}")]
    DatabaseNotFound(PathBuf),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Failed to read library directory: {0}")]
    Walk(String),
}
