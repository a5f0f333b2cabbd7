//! Error types for the transcoder module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while transcoding.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// Encoder exited unsuccessfully. `output` holds its stdout, then its stderr.
    #[error("Transcode failed ({}): {output}", exit_description(.status))]
    Failed { status: Option<i32>, output: String },

    /// Injected by test doubles.
    #[error("Transcode failed: {reason}")]
    Simulated { reason: String },

    /// I/O error while spawning or waiting for the encoder.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_description(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl TranscodeError {
    /// Captured encoder output, when there is any.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Failed { output, .. } => Some(output),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_display_includes_output() {
        let err = TranscodeError::Failed {
            status: Some(1),
            output: "Unknown encoder 'libfoo'".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("exit code 1"));
        assert!(text.contains("Unknown encoder 'libfoo'"));
        assert_eq!(err.output(), Some("Unknown encoder 'libfoo'"));
    }

    #[test]
    fn test_killed_by_signal_display() {
        let err = TranscodeError::Failed {
            status: None,
            output: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
    }
}
