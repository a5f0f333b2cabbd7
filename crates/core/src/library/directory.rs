//! Plain directory tree as a library.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{LibraryError, TrackSource};

/// Every regular file below a root directory, sorted by name.
pub struct DirectoryLibrary {
    root: PathBuf,
}

impl DirectoryLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TrackSource for DirectoryLibrary {
    fn name(&self) -> &str {
        "directory"
    }

    fn track_paths(&self) -> Result<Vec<PathBuf>, LibraryError> {
        if !self.root.is_dir() {
            return Err(LibraryError::Walk(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name();

        let mut paths = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Error reading directory entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() {
                paths.push(entry.into_path());
            }
        }

        debug!("Found {} files below {}", paths.len(), self.root.display());
        Ok(paths)
    }
}
