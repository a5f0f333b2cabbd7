//! Configuration for the transcoder module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the FFmpeg-based transcoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscoderConfig {
    /// Path to ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Arguments placed between the input and the output path.
    #[serde(default)]
    pub args: Vec<String>,

    /// Extension of the produced files, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_extension() -> String {
    "mp3".to_string()
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            args: Vec::new(),
            extension: default_extension(),
        }
    }
}

impl TranscoderConfig {
    /// Sets the ffmpeg binary.
    pub fn with_ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = path.into();
        self
    }

    /// Sets the encoder arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the output extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TranscoderConfig::default();
        assert_eq!(config.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert!(config.args.is_empty());
        assert_eq!(config.extension, "mp3");
    }

    #[test]
    fn test_config_builder() {
        let config = TranscoderConfig::default()
            .with_ffmpeg_path("/usr/local/bin/ffmpeg")
            .with_args(["-c:a", "libopus"])
            .with_extension("opus");

        assert_eq!(config.ffmpeg_path, PathBuf::from("/usr/local/bin/ffmpeg"));
        assert_eq!(config.args, vec!["-c:a", "libopus"]);
        assert_eq!(config.extension, "opus");
    }
}
