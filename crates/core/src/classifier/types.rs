//! Types for the classifier module.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// What to do with a library file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAction {
    /// The target plays the file as is.
    Copy,
    /// Audio the target cannot play; convert it first.
    Transcode,
    /// Not audio, unreadable, or gone.
    Ignore,
}

impl FileAction {
    /// Label used for logging and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Transcode => "transcode",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected MIME type, e.g. `audio/flac`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentType {
    mime: String,
}

impl ContentType {
    pub fn new(mime: impl Into<String>) -> Self {
        Self { mime: mime.into() }
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Top-level media type (`audio` for `audio/flac`).
    pub fn media_type(&self) -> &str {
        self.mime.split('/').next().unwrap_or_default()
    }

    pub fn is_audio(&self) -> bool {
        self.media_type() == "audio"
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mime)
    }
}

/// Content types a target plays natively.
#[derive(Debug, Clone, Default)]
pub struct TargetCapabilities {
    supported_mime: HashSet<String>,
}

impl TargetCapabilities {
    pub fn new(supported_mime: impl IntoIterator<Item = String>) -> Self {
        Self {
            supported_mime: supported_mime
                .into_iter()
                .map(|m| m.trim().to_string())
                .collect(),
        }
    }

    pub fn supports(&self, mime: &str) -> bool {
        self.supported_mime.contains(mime.trim())
    }

    pub fn is_empty(&self) -> bool {
        self.supported_mime.is_empty()
    }
}
