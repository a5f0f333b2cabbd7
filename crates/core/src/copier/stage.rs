//! Serialized copy worker.

use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::cleanup::CleanupTracker;
use crate::metrics;
use crate::processor::{AbortSignal, PipelineError};

use super::error::CopyError;
use super::types::{CopyMessage, CopyRequest, CopyStats};

/// The only task that writes to the target.
pub struct CopyStage {
    tracker: CleanupTracker,
    abort: AbortSignal,
    buffer_size: usize,
    stats: CopyStats,
}

fn complete(completion: Option<oneshot::Sender<()>>) {
    if let Some(tx) = completion {
        // The submitter may have gone away; nothing to do then.
        let _ = tx.send(());
    }
}

impl CopyStage {
    pub fn new(tracker: CleanupTracker, abort: AbortSignal, buffer_size: usize) -> Self {
        Self {
            tracker,
            abort,
            buffer_size: buffer_size.max(1),
            stats: CopyStats::default(),
        }
    }

    /// Services `rx` until a stop message, an abort message or a copy failure.
    ///
    /// An abort message is returned as the stage's error. Requests that arrive
    /// after the pipeline started aborting are completed without being copied.
    pub async fn run(
        mut self,
        mut rx: mpsc::Receiver<CopyMessage>,
    ) -> Result<CopyStats, PipelineError> {
        while let Some(message) = rx.recv().await {
            match message {
                CopyMessage::Stop => {
                    debug!("Copy stage stopping");
                    return Ok(self.stats);
                }
                CopyMessage::Abort(err) => {
                    self.abort.trigger(err.to_string());
                    return Err(err);
                }
                CopyMessage::Copy(mut request) => {
                    let completion = request.completion.take();

                    if self.abort.is_set() {
                        debug!(
                            "Skipping copy of {} after abort",
                            request.source.display()
                        );
                        self.stats.skipped += 1;
                        complete(completion);
                        continue;
                    }

                    match self.process(&request).await {
                        Ok(bytes) => {
                            self.stats.files_copied += 1;
                            self.stats.bytes_copied += bytes;
                            metrics::BYTES_COPIED.inc_by(bytes);
                            complete(completion);
                        }
                        Err(e) => {
                            error!(
                                "Copy of {} to {} failed: {}",
                                request.source.display(),
                                request.destination.display(),
                                e
                            );
                            self.abort.trigger(e.to_string());
                            complete(completion);
                            return Err(e.into());
                        }
                    }
                }
            }
        }

        // Every sender is gone; treat it like a stop.
        Ok(self.stats)
    }

    async fn process(&self, request: &CopyRequest) -> Result<u64, CopyError> {
        info!(
            "Copy: {} -> {}",
            request.source.display(),
            request.destination.display()
        );
        self.tracker.track(&request.destination);

        if let Some(parent) = request.destination.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CopyError::DirectoryCreationFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let bytes = self
            .copy_file(&request.source, &request.destination)
            .await?;
        self.tracker.untrack(&request.destination);

        if request.delete_source {
            info!("Deleting: {}", request.source.display());
            fs::remove_file(&request.source)
                .await
                .map_err(|e| CopyError::CleanupFailed {
                    path: request.source.clone(),
                    source: e,
                })?;
            self.tracker.untrack(&request.source);
        }

        Ok(bytes)
    }

    /// Buffered copy, creating or truncating the destination.
    async fn copy_file(&self, source: &Path, destination: &Path) -> Result<u64, CopyError> {
        let source_file = File::open(source).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CopyError::SourceNotFound {
                    path: source.to_path_buf(),
                }
            } else {
                CopyError::Io(e)
            }
        })?;

        let dest_file = File::create(destination).await.map_err(|e| {
            CopyError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
        })?;

        let mut reader = BufReader::with_capacity(self.buffer_size, source_file);
        let mut writer = BufWriter::with_capacity(self.buffer_size, dest_file);

        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let bytes_read = reader.read(&mut buffer).await.map_err(|e| {
                CopyError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;

            if bytes_read == 0 {
                break;
            }

            writer.write_all(&buffer[..bytes_read]).await.map_err(|e| {
                CopyError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;

            total_bytes += bytes_read as u64;
        }

        writer.flush().await.map_err(|e| {
            CopyError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
        })?;

        Ok(total_bytes)
    }
}
