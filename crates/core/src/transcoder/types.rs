use std::path::PathBuf;
use std::time::Duration;

/// Result of a successful transcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeOutcome {
    /// File written by the encoder.
    pub output_path: PathBuf,
    /// Wall-clock time spent in the encoder.
    pub elapsed: Duration,
}
