//! Library scan - where the list of tracks to sync comes from.
//!
//! A [`TrackSource`] yields absolute local paths in library order. A
//! [`LibraryScan`] then keeps the ones below the configured source root that
//! are not excluded, and pairs each with its path relative to that root.

mod banshee;
mod directory;
mod scan;
mod types;

pub use banshee::{file_uri_to_path, BansheeLibrary};
pub use directory::DirectoryLibrary;
pub use scan::LibraryScan;
pub use types::*;

use std::path::PathBuf;

/// Trait for track listings.
pub trait TrackSource: Send + Sync {
    /// Returns the name of this source implementation.
    fn name(&self) -> &str;

    /// Absolute paths of all tracks, in library order.
    fn track_paths(&self) -> Result<Vec<PathBuf>, LibraryError>;
}
