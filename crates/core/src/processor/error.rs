//! Error types for the processor module.

use std::path::PathBuf;
use thiserror::Error;

use crate::copier::CopyError;
use crate::transcoder::TranscodeError;

/// Fatal error that ends a sync run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The encoder failed on one input.
    #[error("Transcoding {} failed: {source}", .input.display())]
    Transcode {
        input: PathBuf,
        #[source]
        source: TranscodeError,
    },

    /// Writing to the target failed.
    #[error(transparent)]
    Copy(#[from] CopyError),

    /// A worker task panicked or was cancelled.
    #[error("Worker panicked: {0}")]
    WorkerPanicked(String),

    /// Another part of the pipeline already failed.
    #[error("Pipeline aborted: {0}")]
    Aborted(String),

    /// Stopped from outside (SIGINT, SIGTERM) and drained.
    #[error("Interrupted")]
    Interrupted,
}

impl PipelineError {
    /// Captured encoder output, for transcode failures.
    pub fn encoder_output(&self) -> Option<&str> {
        match self {
            Self::Transcode { source, .. } => source.output(),
            _ => None,
        }
    }
}
