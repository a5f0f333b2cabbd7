use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::classifier::TargetCapabilities;
use crate::processor::ProcessorConfig;
use crate::transcoder::TranscoderConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Root of the local library. Tracks outside of it are never synced.
    pub source: PathBuf,
    /// Paths relative to `source` that are left out, together with everything below them.
    #[serde(default)]
    pub exclude: Vec<PathBuf>,
    /// Encoder binary.
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: PathBuf,
    #[serde(default)]
    pub library: LibraryConfig,
    pub target: TargetConfig,
    #[serde(default)]
    pub pipeline: ProcessorConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

fn default_ffmpeg() -> PathBuf {
    PathBuf::from("ffmpeg")
}

impl Config {
    /// Encoder settings for the transcode worker pool.
    pub fn transcoder_config(&self) -> TranscoderConfig {
        TranscoderConfig {
            ffmpeg_path: self.ffmpeg.clone(),
            args: self.target.transcode.args.clone(),
            extension: self.target.transcode.extension.clone(),
        }
    }

    /// Content types the target plays natively.
    pub fn capabilities(&self) -> TargetCapabilities {
        TargetCapabilities::new(self.target.supported_mime.iter().cloned())
    }
}

/// Where the list of tracks comes from
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    #[serde(default)]
    pub kind: LibraryKind,
    /// Banshee database, only read when `kind = "banshee"`.
    #[serde(default = "default_database")]
    pub database: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            kind: LibraryKind::default(),
            database: default_database(),
        }
    }
}

fn default_database() -> PathBuf {
    let relative = PathBuf::from(".config/banshee-1/banshee.db");
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(relative),
        None => relative,
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LibraryKind {
    #[default]
    Banshee,
    Directory,
}

/// Target device or directory
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetConfig {
    /// Already mounted directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// MTP device as `SERIAL/path/on/device`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtp: Option<String>,
    /// MIME types the device plays without transcoding.
    #[serde(default)]
    pub supported_mime: Vec<String>,
    #[serde(default)]
    pub folders: FoldersConfig,
    pub transcode: TranscodeTargetConfig,
}

/// Folders on the target, relative to its root
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FoldersConfig {
    #[serde(default)]
    pub music: PathBuf,
}

/// Output format for files the target cannot play
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscodeTargetConfig {
    /// Extension of transcoded files, without the dot.
    pub extension: String,
    /// Encoder arguments placed between the input and the output path.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Metrics export
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetricsConfig {
    /// File written in the Prometheus text format at the end of a run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textfile: Option<PathBuf>,
}
