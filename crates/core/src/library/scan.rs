//! Source-root membership and exclusions.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::{LibraryEntry, LibraryError, TrackSource};

/// Drops repeated and trailing separators as well as `.` components.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Filter that turns local track paths into [`LibraryEntry`] values.
#[derive(Debug, Clone)]
pub struct LibraryScan {
    source_root: PathBuf,
    exclude: Vec<PathBuf>,
}

impl LibraryScan {
    /// `exclude` entries are relative to `source_root`; each one also covers
    /// everything below it.
    pub fn new<I, P>(source_root: impl AsRef<Path>, exclude: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            source_root: normalize(source_root.as_ref()),
            exclude: exclude
                .into_iter()
                .map(|p| normalize(p.as_ref()))
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Entry for `local_path`, or `None` when it lies outside the source root,
    /// is the root itself, or is excluded.
    pub fn entry(&self, local_path: &Path) -> Option<LibraryEntry> {
        let local_path = normalize(local_path);
        let relative = local_path.strip_prefix(&self.source_root).ok()?;
        if relative.as_os_str().is_empty() {
            return None;
        }

        if let Some(rule) = self.exclude.iter().find(|e| relative.starts_with(e)) {
            debug!(
                "Excluded by {}: {}",
                rule.display(),
                local_path.display()
            );
            return None;
        }

        Some(LibraryEntry {
            relative_path: relative.to_path_buf(),
            local_path,
        })
    }

    /// Lists `source` and keeps the entries that pass [`LibraryScan::entry`],
    /// in source order.
    pub fn scan(&self, source: &dyn TrackSource) -> Result<Vec<LibraryEntry>, LibraryError> {
        let paths = source.track_paths()?;
        let total = paths.len();
        let entries: Vec<LibraryEntry> = paths.iter().filter_map(|p| self.entry(p)).collect();
        debug!(
            "{} of {} tracks from {} are below {}",
            entries.len(),
            total,
            source.name(),
            self.source_root.display()
        );
        Ok(entries)
    }
}
