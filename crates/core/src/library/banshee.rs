//! Banshee media player library.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, warn};

use super::{LibraryError, TrackSource};

/// Reads track locations from a Banshee `banshee.db`, without modifying it.
pub struct BansheeLibrary {
    database: PathBuf,
}

impl BansheeLibrary {
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
        }
    }

    pub fn database(&self) -> &Path {
        &self.database
    }

    fn open(&self) -> Result<Connection, LibraryError> {
        if !self.database.is_file() {
            return Err(LibraryError::DatabaseNotFound(self.database.clone()));
        }
        Connection::open_with_flags(&self.database, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| LibraryError::Database(e.to_string()))
    }
}

impl TrackSource for BansheeLibrary {
    fn name(&self) -> &str {
        "banshee"
    }

    fn track_paths(&self) -> Result<Vec<PathBuf>, LibraryError> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare("SELECT Uri FROM CoreTracks ORDER BY TrackID")
            .map_err(|e| LibraryError::Database(e.to_string()))?;
        let uris = stmt
            .query_map([], |row| row.get::<_, Option<String>>(0))
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        let mut paths = Vec::new();
        for uri in uris {
            let uri = match uri.map_err(|e| LibraryError::Database(e.to_string()))? {
                Some(uri) => uri,
                None => continue,
            };
            if let Some(path) = file_uri_to_path(&uri) {
                paths.push(path);
            }
        }

        debug!(
            "Read {} local tracks from {}",
            paths.len(),
            self.database.display()
        );
        Ok(paths)
    }
}

/// Local path of a `file://` URI. Any host part is dropped.
///
/// Returns `None` for other schemes and, with a warning, for URIs that do not
/// percent-decode to UTF-8.
pub fn file_uri_to_path(uri: &str) -> Option<PathBuf> {
    let rest = uri.strip_prefix("file://")?;
    let encoded = match rest.find('/') {
        Some(idx) => &rest[idx..],
        None => return None,
    };

    match urlencoding::decode(encoded) {
        Ok(decoded) => Some(PathBuf::from(decoded.into_owned())),
        Err(e) => {
            warn!("Skipping undecodable track URI {}: {}", uri, e);
            None
        }
    }
}
