use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

/// Shared set of pending-deletion paths. Clones share the same set.
#[derive(Debug, Clone, Default)]
pub struct CleanupTracker {
    pending: Arc<Mutex<HashSet<PathBuf>>>,
}

/// Outcome of a [`CleanupTracker::purge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeReport {
    /// Files that were removed.
    pub deleted: Vec<PathBuf>,
    /// Tracked paths that no longer existed.
    pub missing: Vec<PathBuf>,
    /// Paths that could not be removed, with the error text.
    pub failed: Vec<(PathBuf, String)>,
}

impl PurgeReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl CleanupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the set half-updated, so the
    // poisoned guard is still usable.
    fn lock(&self) -> MutexGuard<'_, HashSet<PathBuf>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `path`. Returns `false` if it was already tracked.
    pub fn track(&self, path: impl Into<PathBuf>) -> bool {
        self.lock().insert(path.into())
    }

    /// Forgets `path`. Returns `false` if it was not tracked.
    pub fn untrack(&self, path: &Path) -> bool {
        self.lock().remove(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.lock().contains(path)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Currently tracked paths, sorted.
    pub fn snapshot(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.lock().iter().cloned().collect();
        paths.sort();
        paths
    }

    /// Deletes every tracked path and empties the set.
    ///
    /// Paths that are already gone are not an error. Other failures are logged
    /// and reported; they never stop the remaining deletions.
    pub fn purge(&self) -> PurgeReport {
        let mut paths: Vec<PathBuf> = self.lock().drain().collect();
        paths.sort();

        let mut report = PurgeReport::default();
        for path in paths {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    info!("Deleting: {}", path.display());
                    report.deleted.push(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!("Already gone: {}", path.display());
                    report.missing.push(path);
                }
                Err(e) => {
                    warn!("Failed to delete {}: {}", path.display(), e);
                    report.failed.push((path, e.to_string()));
                }
            }
        }
        report
    }

    /// Returns a guard that purges this tracker when dropped.
    pub fn guard(&self) -> CleanupGuard {
        CleanupGuard {
            tracker: self.clone(),
        }
    }
}

/// Purges its tracker on drop, including during unwinding.
#[derive(Debug)]
#[must_use = "the tracker is purged as soon as the guard is dropped"]
pub struct CleanupGuard {
    tracker: CleanupTracker,
}

impl CleanupGuard {
    pub fn tracker(&self) -> &CleanupTracker {
        &self.tracker
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        if !self.tracker.is_empty() {
            self.tracker.purge();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_track_and_untrack_are_idempotent() {
        let tracker = CleanupTracker::new();
        let path = PathBuf::from("/tmp/tracksync-a.mp3");

        assert!(tracker.track(&path));
        assert!(!tracker.track(&path));
        assert_eq!(tracker.len(), 1);
        assert!(tracker.contains(&path));

        assert!(tracker.untrack(&path));
        assert!(!tracker.untrack(&path));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let tracker = CleanupTracker::new();
        let other = tracker.clone();
        other.track("/x");
        assert!(tracker.contains(Path::new("/x")));
    }

    #[test]
    fn test_purge_deletes_existing_and_skips_missing() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("half-written.mp3");
        let gone = dir.path().join("already-gone.mp3");
        std::fs::write(&present, b"partial").unwrap();

        let tracker = CleanupTracker::new();
        tracker.track(&present);
        tracker.track(&gone);

        let report = tracker.purge();
        assert_eq!(report.deleted, vec![present.clone()]);
        assert_eq!(report.missing, vec![gone]);
        assert!(report.is_clean());
        assert!(!present.exists());
        assert!(tracker.is_empty());
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_purge_logs_only_real_deletions() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("tracksync-1.mp3");
        let gone = dir.path().join("tracksync-2.mp3");
        std::fs::write(&present, b"partial").unwrap();

        let tracker = CleanupTracker::new();
        tracker.track(&present);
        tracker.track(&gone);

        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || tracker.purge());

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains(&format!("Deleting: {}", present.display())));
        assert!(!text.contains(&gone.display().to_string()));
    }

    #[test]
    fn test_purge_reports_failures_and_continues() {
        let dir = TempDir::new().unwrap();
        // remove_file on a directory fails with something other than NotFound
        let subdir = dir.path().join("a-dir");
        std::fs::create_dir(&subdir).unwrap();
        let file = dir.path().join("b.mp3");
        std::fs::write(&file, b"x").unwrap();

        let tracker = CleanupTracker::new();
        tracker.track(&subdir);
        tracker.track(&file);

        let report = tracker.purge();
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, subdir);
        assert_eq!(report.deleted, vec![file.clone()]);
        assert!(!file.exists());
    }

    #[test]
    fn test_guard_purges_on_drop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tmp.mp3");
        std::fs::write(&path, b"x").unwrap();

        let tracker = CleanupTracker::new();
        {
            let _guard = tracker.guard();
            tracker.track(&path);
        }
        assert!(!path.exists());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_guard_purges_during_panic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tmp.mp3");
        std::fs::write(&path, b"x").unwrap();

        let tracker = CleanupTracker::new();
        let inner = tracker.clone();
        let inner_path = path.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = inner.guard();
            inner.track(inner_path);
            panic!("worker blew up");
        });

        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_concurrent_tracking() {
        let tracker = CleanupTracker::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let tracker = tracker.clone();
                std::thread::spawn(move || {
                    for j in 0..100 {
                        let path = PathBuf::from(format!("/tmp/{}-{}", i, j));
                        tracker.track(&path);
                        if j % 2 == 0 {
                            tracker.untrack(&path);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(tracker.len(), 8 * 50);
    }
}
