//! Registry of files that exist on disk in a transient state.
//!
//! A path is tracked while it is half-written (a destination mid-copy, or a
//! temporary transcode output that has not been copied yet). Whatever is still
//! tracked when the run ends is deleted by [`CleanupTracker::purge`], which the
//! [`CleanupGuard`] also runs on drop so that early returns and panics clean up
//! too.

mod tracker;

pub use tracker::{CleanupGuard, CleanupTracker, PurgeReport};
