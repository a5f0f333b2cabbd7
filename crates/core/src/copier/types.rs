use std::path::PathBuf;

use tokio::sync::oneshot;

use crate::processor::PipelineError;

/// One write to the target.
#[derive(Debug)]
pub struct CopyRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Remove `source` once it has been copied.
    pub delete_source: bool,
    /// Fired when the stage is done with this request, successful or not.
    pub completion: Option<oneshot::Sender<()>>,
}

impl CopyRequest {
    /// Copy of a library file. The source is left in place.
    pub fn verbatim(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            delete_source: false,
            completion: None,
        }
    }

    /// Copy of a temporary transcode output, deleted afterwards.
    ///
    /// The returned receiver resolves once the stage has handled the request.
    pub fn transcoded(
        temp: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        let request = Self {
            source: temp.into(),
            destination: destination.into(),
            delete_source: true,
            completion: Some(tx),
        };
        (request, rx)
    }
}

/// Element of the copy stage's queue.
#[derive(Debug)]
pub enum CopyMessage {
    Copy(CopyRequest),
    /// A fatal error raised elsewhere, re-raised by the stage.
    Abort(PipelineError),
    Stop,
}

/// Totals produced by a copy stage run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files_copied: usize,
    pub bytes_copied: u64,
    /// Requests dropped because the pipeline was already aborting.
    pub skipped: usize,
}
