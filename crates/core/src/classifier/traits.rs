//! Trait definitions for the classifier module.

use std::io;
use std::path::Path;

use super::types::ContentType;

/// Detects the content type of a file from its bytes.
pub trait ContentSniffer: Send + Sync {
    /// Returns the name of this sniffer implementation.
    fn name(&self) -> &str;

    /// Sniffs `path`. `Ok(None)` means the content was read but not recognised.
    fn sniff(&self, path: &Path) -> io::Result<Option<ContentType>>;
}
