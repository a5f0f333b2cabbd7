//! Routing of files to a [`FileAction`].

use std::path::Path;

use tracing::{debug, warn};

use super::traits::ContentSniffer;
use super::types::{FileAction, TargetCapabilities};

/// Decides between copy, transcode and ignore for one target.
pub struct Classifier<S: ContentSniffer> {
    sniffer: S,
    capabilities: TargetCapabilities,
}

impl<S: ContentSniffer> Classifier<S> {
    pub fn new(sniffer: S, capabilities: TargetCapabilities) -> Self {
        Self {
            sniffer,
            capabilities,
        }
    }

    pub fn capabilities(&self) -> &TargetCapabilities {
        &self.capabilities
    }

    /// Classifies `path`. Missing or unreadable files are ignored, never an error.
    pub fn classify(&self, path: &Path) -> FileAction {
        if !path.is_file() {
            return FileAction::Ignore;
        }

        let content = match self.sniffer.sniff(path) {
            Ok(Some(content)) => content,
            Ok(None) => {
                debug!("Unrecognised content: {}", path.display());
                return FileAction::Ignore;
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return FileAction::Ignore;
            }
        };

        let action = if self.capabilities.supports(content.mime()) {
            FileAction::Copy
        } else if content.is_audio() {
            FileAction::Transcode
        } else {
            FileAction::Ignore
        };

        debug!(
            "Classified {} as {} ({}, sniffer: {})",
            path.display(),
            action,
            content,
            self.sniffer.name()
        );
        action
    }
}
